// ==========================================
// 理赔记录构建器
// ==========================================

use crate::domain::field_table::{FieldSpec, CLAIM_FIELDS};
use crate::domain::import::RawRow;
use crate::domain::records::{ClaimRecord, TypedRecord};
use crate::domain::types::DataType;
use crate::importer::coercion::{BuildContext, FieldReader, ValidationError};
use crate::importer::importer_trait::RecordBuilder;

pub struct ClaimBuilder;

impl RecordBuilder for ClaimBuilder {
    fn data_type(&self) -> DataType {
        DataType::Claims
    }

    fn fields(&self) -> &'static [FieldSpec] {
        CLAIM_FIELDS
    }

    fn build(&self, row: &RawRow, ctx: &mut BuildContext) -> Result<TypedRecord, ValidationError> {
        let mut r = FieldReader::new(row, ctx);

        Ok(TypedRecord::Claim(ClaimRecord {
            claim_number: r.identifier("claim_number", DataType::Claims.identifier_prefix()),
            policy_number: r.text_or_reference(
                "policy_number",
                DataType::Policies.identifier_prefix(),
                8,
            ),
            claim_type: r.text_or("claim_type", "unknown"),
            claim_amount: r.amount("claim_amount")?,
            approved_amount: r.optional_number("approved_amount")?,
            currency: r.text_or("currency", "USD"),
            incident_date: r.timestamp("incident_date")?,
            claim_date: r.timestamp("claim_date")?,
            processed_date: r.optional_timestamp("processed_date")?,
            settlement_date: r.optional_timestamp("settlement_date")?,
            customer_id: r.text_or_reference(
                "customer_id",
                DataType::Customers.identifier_prefix(),
                8,
            ),
            customer_name: r.text_or("customer_name", "Unknown Customer"),
            agent_id: r.optional_text("agent_id"),
            status: r.text_or("status", "submitted"),
            priority: r.text_or("priority", "medium"),
            description: r.text_or("description", "Claim description"),
            incident_location: r.optional_text("incident_location"),
            adjuster_id: r.optional_text("adjuster_id"),
            adjuster_name: r.optional_text("adjuster_name"),
            is_fraudulent: r.flag("is_fraudulent"),
            requires_investigation: r.flag("requires_investigation"),
            has_attachments: r.flag("has_attachments"),
        }))
    }
}
