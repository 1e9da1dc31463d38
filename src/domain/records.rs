// ==========================================
// 保险业务数据导入 - 业务记录实体
// ==========================================
// 职责: 七类业务记录的强类型结构 + TypedRecord 标签联合
// 约束: 每条记录都携带非空业务主键（与存储自增 id 无关）
// ==========================================

use crate::domain::types::DataType;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// PaymentRecord - 缴费记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payment_id: String,                 // 业务主键 PAY-
    pub transaction_reference: String,      // 交易流水号
    pub amount: f64,
    pub currency: String,
    pub payment_method: String,
    pub payment_status: String,
    pub policy_number: Option<String>,
    pub customer_id: Option<String>,
    pub agent_id: Option<String>,
    pub payment_date: NaiveDateTime,
    pub due_date: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub processing_fee: f64,
    pub is_recurring: bool,
    pub is_late_payment: bool,
}

// ==========================================
// ReceiptRecord - 收据记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub receipt_number: String,             // 业务主键 RCP-
    pub payment_id: String,
    pub amount: f64,
    pub currency: String,
    pub receipt_date: NaiveDateTime,
    pub policy_number: Option<String>,
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub description: Option<String>,
    pub payment_method: String,
    pub receipt_status: String,
    pub email_sent: bool,
}

// ==========================================
// PolicyRecord - 保单记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub policy_number: String,              // 业务主键 POL-
    pub policy_type: String,
    pub premium_amount: f64,
    pub coverage_amount: f64,
    pub deductible: f64,
    pub currency: String,
    pub effective_date: NaiveDateTime,
    pub expiration_date: NaiveDateTime,
    pub renewal_date: Option<NaiveDateTime>,
    pub customer_id: String,
    pub customer_name: String,
    pub agent_id: Option<String>,
    pub agent_name: Option<String>,
    pub status: String,
    pub payment_frequency: String,
    pub next_payment_due: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub auto_renewal: bool,
    pub is_group_policy: bool,
}

// ==========================================
// ClaimRecord - 理赔记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub claim_number: String,               // 业务主键 CLM-
    pub policy_number: String,
    pub claim_type: String,
    pub claim_amount: f64,
    pub approved_amount: Option<f64>,
    pub currency: String,
    pub incident_date: NaiveDateTime,
    pub claim_date: NaiveDateTime,
    pub processed_date: Option<NaiveDateTime>,
    pub settlement_date: Option<NaiveDateTime>,
    pub customer_id: String,
    pub customer_name: String,
    pub agent_id: Option<String>,
    pub status: String,
    pub priority: String,
    pub description: String,
    pub incident_location: Option<String>,
    pub adjuster_id: Option<String>,
    pub adjuster_name: Option<String>,
    pub is_fraudulent: bool,
    pub requires_investigation: bool,
    pub has_attachments: bool,
}

// ==========================================
// CustomerRecord - 客户记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: String,                // 业务主键 CUST-
    pub customer_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,                  // 派生: first_name + last_name
    pub date_of_birth: Option<NaiveDateTime>,
    pub gender: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub status: String,
    pub customer_type: String,
    pub primary_agent_id: Option<String>,
    pub registration_date: NaiveDateTime,
    pub last_contact_date: Option<NaiveDateTime>,
    pub preferred_contact_method: String,
    pub credit_score: Option<i64>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub marketing_consent: bool,
    pub is_vip: bool,
    pub has_claims: bool,
}

// ==========================================
// AgentRecord - 代理人记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub agent_id: String,                   // 业务主键 AGT-
    pub employee_id: Option<String>,
    pub license_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,                  // 派生: first_name + last_name
    pub email: String,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub hire_date: NaiveDateTime,
    pub department: Option<String>,
    pub position: Option<String>,
    pub manager_id: Option<String>,
    pub status: String,
    pub agent_type: String,
    pub total_policies: i64,
    pub active_policies: i64,
    pub total_premium_written: f64,
    pub commission_rate: f64,
    pub total_commission_earned: f64,
    pub last_commission_date: Option<NaiveDateTime>,
    pub territory: Option<String>,
    pub specialization: Option<String>,
    pub license_state: Option<String>,
    pub license_expiry: Option<NaiveDateTime>,
    pub customer_satisfaction_score: Option<f64>,
    pub performance_rating: Option<String>,
    pub notes: Option<String>,
    pub is_top_performer: bool,
    pub can_approve_claims: bool,
}

// ==========================================
// AuditLogRecord - 审计日志记录
// ==========================================
// 既可由文件导入，也承载每次导入自身的 FILE_IMPORT 审计条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogRecord {
    pub log_id: String,                     // 业务主键 LOG- / IMPORT-
    pub session_id: Option<String>,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub user_role: Option<String>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub event_timestamp: NaiveDateTime,
    pub event_type: String,
    pub severity: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub request_method: Option<String>,
    pub request_url: Option<String>,
    pub description: Option<String>,
    pub error_message: Option<String>,
    pub status: String,
    pub is_sensitive: bool,
    pub requires_review: bool,
    pub correlation_id: Option<String>,
    pub parent_log_id: Option<String>,
}

// ==========================================
// TypedRecord - 七类记录的标签联合
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "data_type", rename_all = "snake_case")]
pub enum TypedRecord {
    Payment(PaymentRecord),
    Receipt(ReceiptRecord),
    Policy(PolicyRecord),
    Claim(ClaimRecord),
    Customer(CustomerRecord),
    Agent(AgentRecord),
    AuditLog(AuditLogRecord),
}

impl TypedRecord {
    /// 记录所属数据类型
    pub fn data_type(&self) -> DataType {
        match self {
            TypedRecord::Payment(_) => DataType::Payments,
            TypedRecord::Receipt(_) => DataType::Receipts,
            TypedRecord::Policy(_) => DataType::Policies,
            TypedRecord::Claim(_) => DataType::Claims,
            TypedRecord::Customer(_) => DataType::Customers,
            TypedRecord::Agent(_) => DataType::Agents,
            TypedRecord::AuditLog(_) => DataType::AuditLogs,
        }
    }

    /// 业务主键
    pub fn business_id(&self) -> &str {
        match self {
            TypedRecord::Payment(r) => &r.payment_id,
            TypedRecord::Receipt(r) => &r.receipt_number,
            TypedRecord::Policy(r) => &r.policy_number,
            TypedRecord::Claim(r) => &r.claim_number,
            TypedRecord::Customer(r) => &r.customer_id,
            TypedRecord::Agent(r) => &r.agent_id,
            TypedRecord::AuditLog(r) => &r.log_id,
        }
    }

    /// 字段名 → 值的扁平映射（不含 data_type 标签），供仓储按字段表落库
    pub fn to_field_map(&self) -> serde_json::Result<serde_json::Map<String, serde_json::Value>> {
        let value = match self {
            TypedRecord::Payment(r) => serde_json::to_value(r)?,
            TypedRecord::Receipt(r) => serde_json::to_value(r)?,
            TypedRecord::Policy(r) => serde_json::to_value(r)?,
            TypedRecord::Claim(r) => serde_json::to_value(r)?,
            TypedRecord::Customer(r) => serde_json::to_value(r)?,
            TypedRecord::Agent(r) => serde_json::to_value(r)?,
            TypedRecord::AuditLog(r) => serde_json::to_value(r)?,
        };

        match value {
            serde_json::Value::Object(map) => Ok(map),
            _ => Ok(serde_json::Map::new()),
        }
    }
}
