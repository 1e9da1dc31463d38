// ==========================================
// 保单记录构建器
// ==========================================

use crate::domain::field_table::{FieldSpec, POLICY_FIELDS};
use crate::domain::import::RawRow;
use crate::domain::records::{PolicyRecord, TypedRecord};
use crate::domain::types::DataType;
use crate::importer::coercion::{BuildContext, FieldReader, ValidationError};
use crate::importer::importer_trait::RecordBuilder;

pub struct PolicyBuilder;

impl RecordBuilder for PolicyBuilder {
    fn data_type(&self) -> DataType {
        DataType::Policies
    }

    fn fields(&self) -> &'static [FieldSpec] {
        POLICY_FIELDS
    }

    fn build(&self, row: &RawRow, ctx: &mut BuildContext) -> Result<TypedRecord, ValidationError> {
        let mut r = FieldReader::new(row, ctx);

        Ok(TypedRecord::Policy(PolicyRecord {
            policy_number: r.identifier("policy_number", DataType::Policies.identifier_prefix()),
            policy_type: r.text_or("policy_type", "unknown"),
            premium_amount: r.amount("premium_amount")?,
            coverage_amount: r.amount("coverage_amount")?,
            deductible: r.amount("deductible")?,
            currency: r.text_or("currency", "USD"),
            effective_date: r.timestamp("effective_date")?,
            expiration_date: r.timestamp("expiration_date")?,
            renewal_date: r.optional_timestamp("renewal_date")?,
            customer_id: r.text_or_reference(
                "customer_id",
                DataType::Customers.identifier_prefix(),
                8,
            ),
            customer_name: r.text_or("customer_name", "Unknown Customer"),
            agent_id: r.optional_text("agent_id"),
            agent_name: r.optional_text("agent_name"),
            status: r.text_or("status", "active"),
            payment_frequency: r.text_or("payment_frequency", "monthly"),
            next_payment_due: r.optional_timestamp("next_payment_due")?,
            description: r.optional_text("description"),
            auto_renewal: r.flag("auto_renewal"),
            is_group_policy: r.flag("is_group_policy"),
        }))
    }
}
