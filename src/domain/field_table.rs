// ==========================================
// 保险业务数据导入 - 实体字段表
// ==========================================
// 职责: 每类实体的静态字段声明（列名 / 类型 / 必填）
// 用途: 建表 DDL、落库列顺序、读取时的列解码
// 约束: 字段顺序与 records.rs 中的结构体字段一一对应
// ==========================================

use crate::domain::types::DataType;

// ==========================================
// FieldKind - 字段类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Identifier, // 业务主键（缺失时合成）
    Text,       // 文本
    Number,     // 浮点数
    Integer,    // 整数
    Timestamp,  // 时间戳
    Flag,       // 布尔
}

impl FieldKind {
    /// SQLite 列类型
    pub fn sql_type(&self) -> &'static str {
        match self {
            FieldKind::Identifier | FieldKind::Text | FieldKind::Timestamp => "TEXT",
            FieldKind::Number => "REAL",
            FieldKind::Integer | FieldKind::Flag => "INTEGER",
        }
    }
}

// ==========================================
// FieldSpec - 单个字段声明
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn id(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Identifier, required: true }
}

const fn text(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Text, required: true }
}

const fn text_opt(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Text, required: false }
}

const fn num(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Number, required: true }
}

const fn num_opt(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Number, required: false }
}

const fn int(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Integer, required: true }
}

const fn int_opt(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Integer, required: false }
}

const fn ts(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Timestamp, required: true }
}

const fn ts_opt(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Timestamp, required: false }
}

const fn flag(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Flag, required: true }
}

pub const PAYMENT_FIELDS: &[FieldSpec] = &[
    id("payment_id"),
    text("transaction_reference"),
    num("amount"),
    text("currency"),
    text("payment_method"),
    text("payment_status"),
    text_opt("policy_number"),
    text_opt("customer_id"),
    text_opt("agent_id"),
    ts("payment_date"),
    ts_opt("due_date"),
    text_opt("description"),
    num("processing_fee"),
    flag("is_recurring"),
    flag("is_late_payment"),
];

pub const RECEIPT_FIELDS: &[FieldSpec] = &[
    id("receipt_number"),
    text("payment_id"),
    num("amount"),
    text("currency"),
    ts("receipt_date"),
    text_opt("policy_number"),
    text_opt("customer_id"),
    text("customer_name"),
    text_opt("customer_email"),
    text_opt("description"),
    text("payment_method"),
    text("receipt_status"),
    flag("email_sent"),
];

pub const POLICY_FIELDS: &[FieldSpec] = &[
    id("policy_number"),
    text("policy_type"),
    num("premium_amount"),
    num("coverage_amount"),
    num("deductible"),
    text("currency"),
    ts("effective_date"),
    ts("expiration_date"),
    ts_opt("renewal_date"),
    text("customer_id"),
    text("customer_name"),
    text_opt("agent_id"),
    text_opt("agent_name"),
    text("status"),
    text("payment_frequency"),
    ts_opt("next_payment_due"),
    text_opt("description"),
    flag("auto_renewal"),
    flag("is_group_policy"),
];

pub const CLAIM_FIELDS: &[FieldSpec] = &[
    id("claim_number"),
    text("policy_number"),
    text("claim_type"),
    num("claim_amount"),
    num_opt("approved_amount"),
    text("currency"),
    ts("incident_date"),
    ts("claim_date"),
    ts_opt("processed_date"),
    ts_opt("settlement_date"),
    text("customer_id"),
    text("customer_name"),
    text_opt("agent_id"),
    text("status"),
    text("priority"),
    text("description"),
    text_opt("incident_location"),
    text_opt("adjuster_id"),
    text_opt("adjuster_name"),
    flag("is_fraudulent"),
    flag("requires_investigation"),
    flag("has_attachments"),
];

pub const CUSTOMER_FIELDS: &[FieldSpec] = &[
    id("customer_id"),
    text_opt("customer_number"),
    text("first_name"),
    text("last_name"),
    text("full_name"),
    ts_opt("date_of_birth"),
    text_opt("gender"),
    text("email"),
    text_opt("phone"),
    text_opt("mobile"),
    text_opt("address_line1"),
    text_opt("address_line2"),
    text_opt("city"),
    text_opt("state"),
    text_opt("postal_code"),
    text_opt("country"),
    text("status"),
    text("customer_type"),
    text_opt("primary_agent_id"),
    ts("registration_date"),
    ts_opt("last_contact_date"),
    text("preferred_contact_method"),
    int_opt("credit_score"),
    text_opt("payment_method"),
    text_opt("notes"),
    flag("marketing_consent"),
    flag("is_vip"),
    flag("has_claims"),
];

pub const AGENT_FIELDS: &[FieldSpec] = &[
    id("agent_id"),
    text_opt("employee_id"),
    text_opt("license_number"),
    text("first_name"),
    text("last_name"),
    text("full_name"),
    text("email"),
    text_opt("phone"),
    text_opt("mobile"),
    ts("hire_date"),
    text_opt("department"),
    text_opt("position"),
    text_opt("manager_id"),
    text("status"),
    text("agent_type"),
    int("total_policies"),
    int("active_policies"),
    num("total_premium_written"),
    num("commission_rate"),
    num("total_commission_earned"),
    ts_opt("last_commission_date"),
    text_opt("territory"),
    text_opt("specialization"),
    text_opt("license_state"),
    ts_opt("license_expiry"),
    num_opt("customer_satisfaction_score"),
    text_opt("performance_rating"),
    text_opt("notes"),
    flag("is_top_performer"),
    flag("can_approve_claims"),
];

pub const AUDIT_LOG_FIELDS: &[FieldSpec] = &[
    id("log_id"),
    text_opt("session_id"),
    text_opt("user_id"),
    text_opt("user_email"),
    text_opt("user_role"),
    text("action"),
    text("resource_type"),
    text_opt("resource_id"),
    ts("event_timestamp"),
    text("event_type"),
    text("severity"),
    text_opt("ip_address"),
    text_opt("user_agent"),
    text_opt("request_method"),
    text_opt("request_url"),
    text_opt("description"),
    text_opt("error_message"),
    text("status"),
    flag("is_sensitive"),
    flag("requires_review"),
    text_opt("correlation_id"),
    text_opt("parent_log_id"),
];

/// 查找某数据类型的字段表
pub fn fields_for(data_type: DataType) -> &'static [FieldSpec] {
    match data_type {
        DataType::Payments => PAYMENT_FIELDS,
        DataType::Receipts => RECEIPT_FIELDS,
        DataType::Policies => POLICY_FIELDS,
        DataType::Claims => CLAIM_FIELDS,
        DataType::Customers => CUSTOMER_FIELDS,
        DataType::Agents => AGENT_FIELDS,
        DataType::AuditLogs => AUDIT_LOG_FIELDS,
    }
}

/// 按列名查找字段声明
pub fn find_field(data_type: DataType, name: &str) -> Option<&'static FieldSpec> {
    fields_for(data_type).iter().find(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_field_is_business_key() {
        for data_type in DataType::ALL {
            let first = fields_for(data_type)[0];
            assert_eq!(first.kind, FieldKind::Identifier);
            assert_eq!(first.name, data_type.business_key());
        }
    }

    #[test]
    fn test_exactly_one_identifier_per_entity() {
        for data_type in DataType::ALL {
            let count = fields_for(data_type)
                .iter()
                .filter(|f| f.kind == FieldKind::Identifier)
                .count();
            assert_eq!(count, 1, "{} should declare one identifier", data_type);
        }
    }

    #[test]
    fn test_column_names_unique() {
        for data_type in DataType::ALL {
            let mut names: Vec<_> = fields_for(data_type).iter().map(|f| f.name).collect();
            let before = names.len();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), before, "{} has duplicate columns", data_type);
        }
    }

    #[test]
    fn test_find_field() {
        let spec = find_field(DataType::Claims, "approved_amount").unwrap();
        assert_eq!(spec.kind, FieldKind::Number);
        assert!(!spec.required);
        assert!(find_field(DataType::Claims, "no_such_column").is_none());
    }
}
