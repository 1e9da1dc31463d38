// ==========================================
// 客户记录构建器
// ==========================================

use super::derive_full_name;
use crate::domain::field_table::{FieldSpec, CUSTOMER_FIELDS};
use crate::domain::import::RawRow;
use crate::domain::records::{CustomerRecord, TypedRecord};
use crate::domain::types::DataType;
use crate::importer::coercion::{BuildContext, FieldReader, ValidationError};
use crate::importer::importer_trait::RecordBuilder;

pub struct CustomerBuilder;

impl RecordBuilder for CustomerBuilder {
    fn data_type(&self) -> DataType {
        DataType::Customers
    }

    fn fields(&self) -> &'static [FieldSpec] {
        CUSTOMER_FIELDS
    }

    fn build(&self, row: &RawRow, ctx: &mut BuildContext) -> Result<TypedRecord, ValidationError> {
        let mut r = FieldReader::new(row, ctx);

        let first_name = r.text_or("first_name", "Unknown");
        let last_name = r.text_or("last_name", "Customer");
        let full_name = derive_full_name(r.optional_text("full_name"), &first_name, &last_name);

        Ok(TypedRecord::Customer(CustomerRecord {
            customer_id: r.identifier("customer_id", DataType::Customers.identifier_prefix()),
            customer_number: r.optional_text("customer_number"),
            first_name,
            last_name,
            full_name,
            date_of_birth: r.optional_timestamp("date_of_birth")?,
            gender: r.optional_text("gender"),
            email: r.email_or_placeholder("email", "customer"),
            phone: r.optional_text("phone"),
            mobile: r.optional_text("mobile"),
            address_line1: r.optional_text("address_line1"),
            address_line2: r.optional_text("address_line2"),
            city: r.optional_text("city"),
            state: r.optional_text("state"),
            postal_code: r.optional_text("postal_code"),
            country: r.optional_text("country"),
            status: r.text_or("status", "active"),
            customer_type: r.text_or("customer_type", "individual"),
            primary_agent_id: r.optional_text("primary_agent_id"),
            registration_date: r.timestamp("registration_date")?,
            last_contact_date: r.optional_timestamp("last_contact_date")?,
            preferred_contact_method: r.text_or("preferred_contact_method", "email"),
            credit_score: r.optional_integer("credit_score")?,
            payment_method: r.optional_text("payment_method"),
            notes: r.optional_text("notes"),
            marketing_consent: r.flag("marketing_consent"),
            is_vip: r.flag("is_vip"),
            has_claims: r.flag("has_claims"),
        }))
    }
}
