//! Success envelopes.

use ledgerbridge_core::document::DocType;
use ledgerbridge_core::ledger::JournalTotals;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

const SUCCESS: &str = "success";

/// Answer to a create or update.
#[derive(Debug, Serialize)]
pub struct SavedResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Name of the submitted document. After an update this is the
    /// amendment's name.
    pub name: String,
    /// Debit total (journal entries only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_debit: Option<Decimal>,
    /// Credit total (journal entries only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_credit: Option<Decimal>,
}

impl SavedResponse {
    /// A document was created and submitted.
    #[must_use]
    pub fn created(doctype: DocType, name: String) -> Self {
        Self::new(format!("{doctype} created successfully"), name)
    }

    /// A document was replaced.
    #[must_use]
    pub fn updated(doctype: DocType, name: String) -> Self {
        Self::new(format!("{doctype} updated successfully"), name)
    }

    /// Attaches journal totals.
    #[must_use]
    pub fn with_totals(mut self, totals: Option<JournalTotals>) -> Self {
        if let Some(totals) = totals {
            self.total_debit = Some(totals.total_debit);
            self.total_credit = Some(totals.total_credit);
        }
        self
    }

    fn new(message: String, name: String) -> Self {
        Self {
            status: SUCCESS,
            message,
            name,
            total_debit: None,
            total_credit: None,
        }
    }
}

/// Answer to a read.
#[derive(Debug, Serialize)]
pub struct DataResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// The document.
    pub data: Value,
}

impl DataResponse {
    /// Wraps a document.
    #[must_use]
    pub const fn new(data: Value) -> Self {
        Self {
            status: SUCCESS,
            data,
        }
    }
}

/// Answer carrying only a message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// A document was deleted.
    #[must_use]
    pub fn deleted(doctype: DocType) -> Self {
        Self {
            status: SUCCESS,
            message: format!("{doctype} deleted successfully"),
        }
    }
}
