//! Stored document bodies and partial updates.
//!
//! Documents are stored as JSON next to their `doctype`. An update request
//! carries only the fields it changes; those replace the matching top-level
//! fields of the stored document, and the result is rebuilt from scratch.

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::types::DocType;
use crate::invoice::Invoice;
use crate::ledger::JournalEntry;
use crate::payment::PaymentEntry;

/// A validated document of any supported type.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentBody {
    /// Sales invoice.
    SalesInvoice(Invoice),
    /// Purchase invoice.
    PurchaseInvoice(Invoice),
    /// Payment entry.
    PaymentEntry(PaymentEntry),
    /// Journal entry.
    JournalEntry(JournalEntry),
}

impl DocumentBody {
    /// Returns the document type.
    #[must_use]
    pub const fn doctype(&self) -> DocType {
        match self {
            Self::SalesInvoice(_) => DocType::SalesInvoice,
            Self::PurchaseInvoice(_) => DocType::PurchaseInvoice,
            Self::PaymentEntry(_) => DocType::PaymentEntry,
            Self::JournalEntry(_) => DocType::JournalEntry,
        }
    }

    /// Returns the owning company, if any.
    #[must_use]
    pub fn company(&self) -> Option<&str> {
        match self {
            Self::SalesInvoice(doc) | Self::PurchaseInvoice(doc) => doc.company.as_deref(),
            Self::PaymentEntry(doc) => Some(&doc.company),
            Self::JournalEntry(doc) => Some(&doc.company),
        }
    }

    /// Returns the posting date.
    #[must_use]
    pub fn posting_date(&self) -> NaiveDate {
        match self {
            Self::SalesInvoice(doc) | Self::PurchaseInvoice(doc) => doc.posting_date,
            Self::PaymentEntry(doc) => doc.posting_date,
            Self::JournalEntry(doc) => doc.posting_date,
        }
    }

    /// Serializes the body for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be represented as JSON.
    pub fn to_payload(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::SalesInvoice(doc) | Self::PurchaseInvoice(doc) => serde_json::to_value(doc),
            Self::PaymentEntry(doc) => serde_json::to_value(doc),
            Self::JournalEntry(doc) => serde_json::to_value(doc),
        }
    }

    /// Decodes a stored body.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not match the document type.
    pub fn from_payload(doctype: DocType, payload: Value) -> Result<Self, serde_json::Error> {
        Ok(match doctype {
            DocType::SalesInvoice => Self::SalesInvoice(serde_json::from_value(payload)?),
            DocType::PurchaseInvoice => Self::PurchaseInvoice(serde_json::from_value(payload)?),
            DocType::PaymentEntry => Self::PaymentEntry(serde_json::from_value(payload)?),
            DocType::JournalEntry => Self::JournalEntry(serde_json::from_value(payload)?),
        })
    }
}

impl From<Invoice> for DocumentBody {
    fn from(invoice: Invoice) -> Self {
        if invoice.supplier.is_some() {
            Self::PurchaseInvoice(invoice)
        } else {
            Self::SalesInvoice(invoice)
        }
    }
}

impl From<PaymentEntry> for DocumentBody {
    fn from(entry: PaymentEntry) -> Self {
        Self::PaymentEntry(entry)
    }
}

impl From<JournalEntry> for DocumentBody {
    fn from(entry: JournalEntry) -> Self {
        Self::JournalEntry(entry)
    }
}

/// Applies a partial update to a request body.
///
/// Every top-level key of `patch` replaces the same key of `base`; `null`
/// removes it. Child tables are replaced whole, never merged row by row.
///
/// # Errors
///
/// Returns an error if the patched value no longer matches `T`.
pub fn apply_patch<T>(base: &T, patch: &Map<String, Value>) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = match serde_json::to_value(base)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in patch {
        if value.is_null() {
            merged.remove(key);
        } else {
            merged.insert(key.clone(), value.clone());
        }
    }
    serde_json::from_value(Value::Object(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{JournalEntryInput, JournalLineInput};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn base() -> JournalEntryInput {
        JournalEntryInput {
            company: Some("Acme".to_string()),
            remark: Some("Original".to_string()),
            lines: vec![
                JournalLineInput {
                    account: Some("Cash".to_string()),
                    debit_amount: Some(dec!(10)),
                    ..Default::default()
                },
                JournalLineInput {
                    account: Some("Sales".to_string()),
                    credit_amount: Some(dec!(10)),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_patch_replaces_lines_whole() {
        let patch = object(json!({
            "lines": [
                {"account": "Bank", "debit_amount": 5},
                {"account": "Sales", "credit_amount": 5}
            ]
        }));

        let patched = apply_patch(&base(), &patch).unwrap();

        assert_eq!(patched.company.as_deref(), Some("Acme"));
        assert_eq!(patched.lines.len(), 2);
        assert_eq!(patched.lines[0].account.as_deref(), Some("Bank"));
        assert_eq!(patched.lines[0].debit_amount, Some(dec!(5)));
    }

    #[test]
    fn test_patch_null_removes_and_extra_flows_through() {
        let patch = object(json!({ "remark": null, "cheque_no": "77" }));

        let patched = apply_patch(&base(), &patch).unwrap();

        assert_eq!(patched.remark, None);
        assert_eq!(patched.extra["cheque_no"], json!("77"));
        assert_eq!(patched.lines, base().lines);
    }

    #[test]
    fn test_patch_with_wrong_type_fails() {
        let patch = object(json!({ "lines": "not a list" }));

        assert!(apply_patch(&base(), &patch).is_err());
    }
}
