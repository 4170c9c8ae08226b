//! Invoice build errors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::fields::FieldError;
use crate::lookup::{EntityKind, LookupError};

/// Errors that can occur while building an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvoiceError {
    /// A required field is absent.
    #[error("{}", match row { Some(row) => format!("Row {row}: {field} is required"), None => format!("{field} is required") })]
    MissingRequiredField {
        /// Field name.
        field: &'static str,
        /// 1-based row number, for item and tax rows.
        row: Option<usize>,
    },

    /// The invoice has no item rows.
    #[error("Invoice must have at least one item")]
    NoItems,

    /// An item quantity is zero or negative.
    #[error("Row {row}: quantity for item {item_code} must be greater than zero, got {qty}")]
    NonPositiveQuantity {
        /// 1-based row number.
        row: usize,
        /// Item code.
        item_code: String,
        /// Supplied quantity.
        qty: Decimal,
    },

    /// An item rate is negative.
    #[error("Row {row}: rate for item {item_code} cannot be negative, got {rate}")]
    NegativeRate {
        /// 1-based row number.
        row: usize,
        /// Item code.
        item_code: String,
        /// Supplied rate.
        rate: Decimal,
    },

    /// Due date precedes the posting date.
    #[error("Due date {due_date} cannot be before posting date {posting_date}")]
    DueDateBeforePostingDate {
        /// Posting date.
        posting_date: NaiveDate,
        /// Due date.
        due_date: NaiveDate,
    },

    /// A referenced company or tax account does not exist.
    #[error("{kind} {name} does not exist")]
    UnknownEntity {
        /// Kind of record.
        kind: EntityKind,
        /// Record name.
        name: String,
    },

    /// An amount or total does not fit the decimal range.
    #[error("{}", match row { Some(row) => format!("Row {row}: {field} exceeds the largest supported amount"), None => format!("{field} exceeds the largest supported amount") })]
    AmountOverflow {
        /// Amount that overflowed.
        field: &'static str,
        /// 1-based row number, for item and tax rows.
        row: Option<usize>,
    },

    /// An optional field was rejected.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// The entity store failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl InvoiceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingRequiredField { .. } => "MISSING_REQUIRED_FIELD",
            Self::NoItems => "NO_ITEMS",
            Self::NonPositiveQuantity { .. } => "NON_POSITIVE_QUANTITY",
            Self::NegativeRate { .. } => "NEGATIVE_RATE",
            Self::DueDateBeforePostingDate { .. } => "DUE_DATE_BEFORE_POSTING_DATE",
            Self::UnknownEntity { .. } => "UNKNOWN_ENTITY",
            Self::AmountOverflow { .. } => "AMOUNT_OVERFLOW",
            Self::Field(FieldError::UnknownField { .. }) => "UNKNOWN_FIELD",
            Self::Field(FieldError::InvalidFieldType { .. }) => "INVALID_FIELD_TYPE",
            Self::Lookup(_) => "INFRASTRUCTURE_FAILURE",
        }
    }

    /// Returns true if the error describes bad caller input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Lookup(_))
    }
}
