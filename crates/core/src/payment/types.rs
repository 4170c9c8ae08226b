//! Payment entry domain types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::DocType;
use crate::fields::{FieldSpec, FieldType};
use crate::lookup::EntityKind;

/// Kind of party a payment is made to or received from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartyType {
    /// Customer; payments are received.
    Customer,
    /// Supplier; payments are made.
    Supplier,
    /// Employee; payments are made.
    Employee,
    /// Shareholder; payments are made.
    Shareholder,
}

impl PartyType {
    /// Returns the display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Supplier => "Supplier",
            Self::Employee => "Employee",
            Self::Shareholder => "Shareholder",
        }
    }

    /// Returns the master record kind created on demand, if any.
    #[must_use]
    pub const fn master_kind(&self) -> Option<EntityKind> {
        match self {
            Self::Customer => Some(EntityKind::Customer),
            Self::Supplier => Some(EntityKind::Supplier),
            Self::Employee | Self::Shareholder => None,
        }
    }

    /// Returns the direction of money for this party.
    #[must_use]
    pub const fn payment_type(&self) -> PaymentType {
        match self {
            Self::Customer => PaymentType::Receive,
            Self::Supplier | Self::Employee | Self::Shareholder => PaymentType::Pay,
        }
    }
}

/// Direction of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    /// Money comes in.
    Receive,
    /// Money goes out.
    Pay,
}

/// Optional header fields a payment entry accepts besides the typed ones.
pub const HEADER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("mode_of_payment", FieldType::Text),
    FieldSpec::new("reference_no", FieldType::Text),
    FieldSpec::new("reference_date", FieldType::Date),
    FieldSpec::new("remarks", FieldType::Text),
    FieldSpec::new("project", FieldType::Text),
    FieldSpec::new("cost_center", FieldType::Text),
    FieldSpec::new("bank_account", FieldType::Text),
    FieldSpec::new("party_bank_account", FieldType::Text),
    FieldSpec::new("title", FieldType::Text),
];

/// Optional reference row fields besides the typed ones.
pub const REFERENCE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("due_date", FieldType::Date),
    FieldSpec::new("bill_no", FieldType::Text),
];

/// An invoice or journal entry the payment settles, as sent by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentReferenceInput {
    /// Referenced document type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_doctype: Option<String>,
    /// Referenced document name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_name: Option<String>,
    /// Amount settled; defaults to 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocated_amount: Option<Decimal>,
    /// Amount still open on the referenced document; defaults to 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outstanding_amount: Option<Decimal>,
    /// Any other row fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A payment entry as sent by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentEntryInput {
    /// Party type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_type: Option<PartyType>,
    /// Party.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    /// Amount paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_amount: Option<Decimal>,
    /// Account money leaves; resolved from company defaults when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_from: Option<String>,
    /// Account money enters; resolved from company defaults when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_to: Option<String>,
    /// Company; defaults to the configured company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Posting date; defaults to today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posting_date: Option<NaiveDate>,
    /// Documents the payment settles.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<PaymentReferenceInput>,
    /// Any other header fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A validated payment reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReference {
    /// Position, starting at 1.
    pub idx: u32,
    /// Referenced document type.
    pub reference_doctype: DocType,
    /// Referenced document name.
    pub reference_name: String,
    /// Amount settled.
    pub allocated_amount: Decimal,
    /// Amount open before this payment.
    pub outstanding_amount: Decimal,
    /// Recognized optional fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A validated payment entry in Draft stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentEntry {
    /// Direction.
    pub payment_type: PaymentType,
    /// Party type.
    pub party_type: PartyType,
    /// Party.
    pub party: String,
    /// Company.
    pub company: String,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Account money leaves.
    pub paid_from: String,
    /// Account money enters.
    pub paid_to: String,
    /// Amount paid.
    pub paid_amount: Decimal,
    /// Amount received; equal to `paid_amount`.
    pub received_amount: Decimal,
    /// Rate of the source account currency; always 1.
    pub source_exchange_rate: Decimal,
    /// Rate of the target account currency; always 1.
    pub target_exchange_rate: Decimal,
    /// Settled documents.
    #[serde(default)]
    pub references: Vec<PaymentReference>,
    /// Sum of allocated amounts.
    pub total_allocated_amount: Decimal,
    /// Paid amount not allocated to any document.
    pub unallocated_amount: Decimal,
    /// Recognized optional header fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl From<PaymentReference> for PaymentReferenceInput {
    fn from(reference: PaymentReference) -> Self {
        Self {
            reference_doctype: Some(reference.reference_doctype.as_str().to_string()),
            reference_name: Some(reference.reference_name),
            allocated_amount: Some(reference.allocated_amount),
            outstanding_amount: Some(reference.outstanding_amount),
            extra: reference.extra.into_iter().collect(),
        }
    }
}

impl From<PaymentEntry> for PaymentEntryInput {
    fn from(entry: PaymentEntry) -> Self {
        Self {
            party_type: Some(entry.party_type),
            party: Some(entry.party),
            paid_amount: Some(entry.paid_amount),
            paid_from: Some(entry.paid_from),
            paid_to: Some(entry.paid_to),
            company: Some(entry.company),
            posting_date: Some(entry.posting_date),
            references: entry.references.into_iter().map(Into::into).collect(),
            extra: entry.extra.into_iter().collect(),
        }
    }
}
