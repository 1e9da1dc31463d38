// ==========================================
// 保险业务数据导入 - 记录构建器
// ==========================================
// 阶段 2: 归一化行 → 强类型记录
// 每类实体一个构建器，字段规则显式编码（无动态属性赋值）
// ==========================================

mod agent;
mod audit_log;
mod claim;
mod customer;
mod payment;
mod policy;
mod receipt;

pub use agent::AgentBuilder;
pub use audit_log::AuditLogBuilder;
pub use claim::ClaimBuilder;
pub use customer::CustomerBuilder;
pub use payment::PaymentBuilder;
pub use policy::PolicyBuilder;
pub use receipt::ReceiptBuilder;

/// 姓名派生: 未提供 full_name 时由 first/last 拼接
pub(crate) fn derive_full_name(supplied: Option<String>, first_name: &str, last_name: &str) -> String {
    supplied.unwrap_or_else(|| format!("{} {}", first_name, last_name))
}
