// ==========================================
// 代理人记录构建器
// ==========================================

use super::derive_full_name;
use crate::domain::field_table::{FieldSpec, AGENT_FIELDS};
use crate::domain::import::RawRow;
use crate::domain::records::{AgentRecord, TypedRecord};
use crate::domain::types::DataType;
use crate::importer::coercion::{BuildContext, FieldReader, ValidationError};
use crate::importer::importer_trait::RecordBuilder;

pub struct AgentBuilder;

impl RecordBuilder for AgentBuilder {
    fn data_type(&self) -> DataType {
        DataType::Agents
    }

    fn fields(&self) -> &'static [FieldSpec] {
        AGENT_FIELDS
    }

    fn build(&self, row: &RawRow, ctx: &mut BuildContext) -> Result<TypedRecord, ValidationError> {
        let mut r = FieldReader::new(row, ctx);

        let first_name = r.text_or("first_name", "Unknown");
        let last_name = r.text_or("last_name", "Agent");
        let full_name = derive_full_name(r.optional_text("full_name"), &first_name, &last_name);

        Ok(TypedRecord::Agent(AgentRecord {
            agent_id: r.identifier("agent_id", DataType::Agents.identifier_prefix()),
            employee_id: r.optional_text("employee_id"),
            license_number: r.optional_text("license_number"),
            first_name,
            last_name,
            full_name,
            email: r.email_or_placeholder("email", "agent"),
            phone: r.optional_text("phone"),
            mobile: r.optional_text("mobile"),
            hire_date: r.timestamp("hire_date")?,
            department: r.optional_text("department"),
            position: r.optional_text("position"),
            manager_id: r.optional_text("manager_id"),
            status: r.text_or("status", "active"),
            agent_type: r.text_or("agent_type", "employee"),
            total_policies: r.count("total_policies")?,
            active_policies: r.count("active_policies")?,
            total_premium_written: r.amount("total_premium_written")?,
            commission_rate: r.amount("commission_rate")?,
            total_commission_earned: r.amount("total_commission_earned")?,
            last_commission_date: r.optional_timestamp("last_commission_date")?,
            territory: r.optional_text("territory"),
            specialization: r.optional_text("specialization"),
            license_state: r.optional_text("license_state"),
            license_expiry: r.optional_timestamp("license_expiry")?,
            customer_satisfaction_score: r.optional_number("customer_satisfaction_score")?,
            performance_rating: r.optional_text("performance_rating"),
            notes: r.optional_text("notes"),
            is_top_performer: r.flag("is_top_performer"),
            can_approve_claims: r.flag("can_approve_claims"),
        }))
    }
}
