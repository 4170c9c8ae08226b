//! Payment entry build errors.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::fields::FieldError;
use crate::lookup::{EntityKind, LookupError};

/// Errors that can occur while building a payment entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// A required field is absent.
    #[error("{}", match row { Some(row) => format!("Reference row {row}: {field} is required"), None => format!("{field} is required") })]
    MissingRequiredField {
        /// Field name.
        field: &'static str,
        /// 1-based reference row, when the field is on a reference.
        row: Option<usize>,
    },

    /// Paid amount is zero or negative.
    #[error("Paid amount must be greater than zero, got {0}")]
    NonPositivePaidAmount(Decimal),

    /// A referenced company, party or account does not exist.
    #[error("{kind} {name} does not exist")]
    UnknownEntity {
        /// Kind of record.
        kind: EntityKind,
        /// Record name.
        name: String,
    },

    /// An account was not supplied and the company has no default for it.
    #[error("{field} is required: company {company} has no default account for it")]
    MissingDefaultAccount {
        /// `paid_from` or `paid_to`.
        field: &'static str,
        /// Company.
        company: String,
    },

    /// A reference points at a document type payments cannot settle.
    #[error("Reference row {row}: cannot allocate against {doctype}")]
    InvalidReferenceDoctype {
        /// 1-based reference row.
        row: usize,
        /// Supplied document type.
        doctype: String,
    },

    /// A reference amount is negative.
    #[error("Reference row {row}: amounts cannot be negative")]
    NegativeAllocation {
        /// 1-based reference row.
        row: usize,
    },

    /// A reference allocates more than its document has open.
    #[error(
        "Reference row {row}: allocated amount {allocated} exceeds outstanding amount {outstanding}"
    )]
    AllocationExceedsOutstanding {
        /// 1-based reference row.
        row: usize,
        /// Allocated amount.
        allocated: Decimal,
        /// Outstanding amount.
        outstanding: Decimal,
    },

    /// References allocate more than the payment.
    #[error("Total allocated amount {allocated} exceeds paid amount {paid}")]
    AllocationExceedsPaidAmount {
        /// Sum of allocated amounts.
        allocated: Decimal,
        /// Paid amount.
        paid: Decimal,
    },

    /// A total does not fit the decimal range.
    #[error("{field} exceeds the largest supported amount")]
    AmountOverflow {
        /// Total that overflowed.
        field: &'static str,
    },

    /// An optional field was rejected.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// The entity store failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl PaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingRequiredField { .. } => "MISSING_REQUIRED_FIELD",
            Self::NonPositivePaidAmount(_) => "NON_POSITIVE_PAID_AMOUNT",
            Self::UnknownEntity { .. } => "UNKNOWN_ENTITY",
            Self::MissingDefaultAccount { .. } => "MISSING_DEFAULT_ACCOUNT",
            Self::InvalidReferenceDoctype { .. } => "INVALID_REFERENCE_DOCTYPE",
            Self::NegativeAllocation { .. } => "NEGATIVE_ALLOCATION",
            Self::AllocationExceedsOutstanding { .. } => "ALLOCATION_EXCEEDS_OUTSTANDING",
            Self::AllocationExceedsPaidAmount { .. } => "ALLOCATION_EXCEEDS_PAID_AMOUNT",
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
