// ==========================================
// 收据记录构建器
// ==========================================

use crate::domain::field_table::{FieldSpec, RECEIPT_FIELDS};
use crate::domain::import::RawRow;
use crate::domain::records::{ReceiptRecord, TypedRecord};
use crate::domain::types::DataType;
use crate::importer::coercion::{BuildContext, FieldReader, ValidationError};
use crate::importer::importer_trait::RecordBuilder;

pub struct ReceiptBuilder;

impl RecordBuilder for ReceiptBuilder {
    fn data_type(&self) -> DataType {
        DataType::Receipts
    }

    fn fields(&self) -> &'static [FieldSpec] {
        RECEIPT_FIELDS
    }

    fn build(&self, row: &RawRow, ctx: &mut BuildContext) -> Result<TypedRecord, ValidationError> {
        let mut r = FieldReader::new(row, ctx);

        Ok(TypedRecord::Receipt(ReceiptRecord {
            receipt_number: r.identifier("receipt_number", DataType::Receipts.identifier_prefix()),
            payment_id: r.text_or_reference(
                "payment_id",
                DataType::Payments.identifier_prefix(),
                8,
            ),
            amount: r.amount("amount")?,
            currency: r.text_or("currency", "USD"),
            receipt_date: r.timestamp("receipt_date")?,
            policy_number: r.optional_text("policy_number"),
            customer_id: r.optional_text("customer_id"),
            customer_name: r.text_or("customer_name", "Unknown Customer"),
            customer_email: r.optional_text("customer_email"),
            description: r.optional_text("description"),
            payment_method: r.text_or("payment_method", "unknown"),
            receipt_status: r.text_or("receipt_status", "generated"),
            email_sent: r.flag("email_sent"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::record_builder::test_support::{ctx, row};

    #[test]
    fn test_receipt_defaults() {
        let mut ctx = ctx();
        let record = ReceiptBuilder
            .build(&row(&[("receipt_number", "RCP-0001"), ("email_sent", "yes")]), &mut ctx)
            .unwrap();

        let TypedRecord::Receipt(r) = record else {
            panic!("expected receipt");
        };
        assert_eq!(r.receipt_number, "RCP-0001");
        assert!(r.payment_id.starts_with("PAY-"));
        assert_eq!(r.payment_id.len(), 12);
        assert_eq!(r.customer_name, "Unknown Customer");
        assert_eq!(r.receipt_status, "generated");
        assert!(r.email_sent);
    }
}
