// ==========================================
// 缴费记录构建器
// ==========================================

use crate::domain::field_table::{FieldSpec, PAYMENT_FIELDS};
use crate::domain::import::RawRow;
use crate::domain::records::{PaymentRecord, TypedRecord};
use crate::domain::types::DataType;
use crate::importer::coercion::{BuildContext, FieldReader, ValidationError};
use crate::importer::importer_trait::RecordBuilder;

pub struct PaymentBuilder;

impl RecordBuilder for PaymentBuilder {
    fn data_type(&self) -> DataType {
        DataType::Payments
    }

    fn fields(&self) -> &'static [FieldSpec] {
        PAYMENT_FIELDS
    }

    fn build(&self, row: &RawRow, ctx: &mut BuildContext) -> Result<TypedRecord, ValidationError> {
        let mut r = FieldReader::new(row, ctx);

        Ok(TypedRecord::Payment(PaymentRecord {
            payment_id: r.identifier("payment_id", DataType::Payments.identifier_prefix()),
            transaction_reference: r.text_or_reference("transaction_reference", "TXN", 12),
            amount: r.amount("amount")?,
            currency: r.text_or("currency", "USD"),
            payment_method: r.text_or("payment_method", "unknown"),
            payment_status: r.text_or("payment_status", "pending"),
            policy_number: r.optional_text("policy_number"),
            customer_id: r.optional_text("customer_id"),
            agent_id: r.optional_text("agent_id"),
            payment_date: r.timestamp("payment_date")?,
            due_date: r.optional_timestamp("due_date")?,
            description: r.optional_text("description"),
            processing_fee: r.amount("processing_fee")?,
            is_recurring: r.flag("is_recurring"),
            is_late_payment: r.flag("is_late_payment"),
        }))
    }
}
