// ==========================================
// 保险业务数据导入 - 记录模式注册表
// ==========================================
// 职责: 数据类型标签 → 对应构建器（纯静态查找）
// ==========================================

use crate::domain::types::DataType;
use crate::importer::error::ImporterResult;
use crate::importer::importer_trait::RecordBuilder;
use crate::importer::record_builder::{
    AgentBuilder, AuditLogBuilder, ClaimBuilder, CustomerBuilder, PaymentBuilder,
    PolicyBuilder, ReceiptBuilder,
};

static PAYMENT: PaymentBuilder = PaymentBuilder;
static RECEIPT: ReceiptBuilder = ReceiptBuilder;
static POLICY: PolicyBuilder = PolicyBuilder;
static CLAIM: ClaimBuilder = ClaimBuilder;
static CUSTOMER: CustomerBuilder = CustomerBuilder;
static AGENT: AgentBuilder = AgentBuilder;
static AUDIT_LOG: AuditLogBuilder = AuditLogBuilder;

/// 按数据类型取构建器
pub fn builder_for(data_type: DataType) -> &'static dyn RecordBuilder {
    match data_type {
        DataType::Payments => &PAYMENT,
        DataType::Receipts => &RECEIPT,
        DataType::Policies => &POLICY,
        DataType::Claims => &CLAIM,
        DataType::Customers => &CUSTOMER,
        DataType::Agents => &AGENT,
        DataType::AuditLogs => &AUDIT_LOG,
    }
}

/// 按标签解析构建器
///
/// # 返回
/// - Err(ImportError::UnsupportedType): 标签不在七类之内
pub fn resolve(tag: &str) -> ImporterResult<&'static dyn RecordBuilder> {
    let data_type: DataType = tag.parse()?;
    Ok(builder_for(data_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::error::ImportError;

    #[test]
    fn test_resolve_all_tags() {
        for data_type in DataType::ALL {
            let builder = resolve(data_type.as_str()).unwrap();
            assert_eq!(builder.data_type(), data_type);
            assert_eq!(builder.fields()[0].name, data_type.business_key());
        }
    }

    #[test]
    fn test_resolve_unknown_tag() {
        let err = resolve("invoices").err().unwrap();
        assert!(matches!(err, ImportError::UnsupportedType(ref t) if t == "invoices"));
    }
}
