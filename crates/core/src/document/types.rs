//! Document domain types for the submission lifecycle.
//!
//! This module defines the document kinds the service handles and the
//! status every document moves through.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of accounting document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocType {
    /// Sales invoice raised to a customer.
    #[serde(rename = "Sales Invoice")]
    SalesInvoice,
    /// Purchase invoice received from a supplier.
    #[serde(rename = "Purchase Invoice")]
    PurchaseInvoice,
    /// Incoming or outgoing payment.
    #[serde(rename = "Payment Entry")]
    PaymentEntry,
    /// Manual double-entry posting.
    #[serde(rename = "Journal Entry")]
    JournalEntry,
}

impl DocType {
    /// Returns the display name of the document type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SalesInvoice => "Sales Invoice",
            Self::PurchaseInvoice => "Purchase Invoice",
            Self::PaymentEntry => "Payment Entry",
            Self::JournalEntry => "Journal Entry",
        }
    }

    /// Returns the naming series prefix for new documents.
    #[must_use]
    pub const fn naming_prefix(&self) -> &'static str {
        match self {
            Self::SalesInvoice => "ACC-SINV",
            Self::PurchaseInvoice => "ACC-PINV",
            Self::PaymentEntry => "ACC-PAY",
            Self::JournalEntry => "ACC-JV",
        }
    }

    /// Parses a document type from its display name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Sales Invoice" => Some(Self::SalesInvoice),
            "Purchase Invoice" => Some(Self::PurchaseInvoice),
            "Payment Entry" => Some(Self::PaymentEntry),
            "Journal Entry" => Some(Self::JournalEntry),
            _ => None,
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document status.
///
/// The valid transitions are:
/// - Draft → Submitted (submit)
/// - Submitted → Cancelled (cancel)
///
/// A cancelled document is never edited again; it is replaced by an
/// amendment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocStatus {
    /// Saved but not yet effective.
    Draft,
    /// Effective and immutable.
    Submitted,
    /// Reversed; kept for audit.
    Cancelled,
}

impl DocStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns the numeric docstatus stored by the database (0, 1, 2).
    #[must_use]
    pub const fn code(&self) -> i16 {
        match self {
            Self::Draft => 0,
            Self::Submitted => 1,
            Self::Cancelled => 2,
        }
    }

    /// Parses the numeric docstatus.
    #[must_use]
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Draft),
            1 => Some(Self::Submitted),
            2 => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if the document content can still change in place.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if an update must replace the document with an amendment.
    #[must_use]
    pub fn can_amend(&self) -> bool {
        matches!(self, Self::Submitted)
    }
}

impl fmt::Display for DocStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the persistence layer must do to apply an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAction {
    /// Overwrite the draft, then submit it.
    ReplaceDraft,
    /// Cancel the submitted document, then insert and submit an amendment.
    CancelAndAmend,
}

/// What the persistence layer must do to delete a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAction {
    /// Delete directly.
    Delete,
    /// Cancel first, then delete.
    CancelThenDelete,
}
