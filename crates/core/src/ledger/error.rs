//! Journal entry build errors.
//!
//! Every variant except `Lookup` describes bad caller input and is reported
//! back as data. `Lookup` means the entity store itself failed.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::fields::FieldError;
use crate::lookup::{EntityKind, LookupError};

/// Errors that can occur while building a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JournalError {
    /// A required field is absent (header field when `row` is `None`).
    #[error("{}", missing_message(field, *row))]
    MissingRequiredField {
        /// Field name.
        field: &'static str,
        /// 1-based line number.
        row: Option<usize>,
    },

    /// Fewer than two lines.
    #[error("Journal Entry must have at least 2 lines, got {count}")]
    InsufficientLines {
        /// Number of lines supplied.
        count: usize,
    },

    /// A referenced company or account does not exist.
    #[error("{}", unknown_message(*kind, name, *row))]
    UnknownEntity {
        /// Kind of record.
        kind: EntityKind,
        /// Record name.
        name: String,
        /// 1-based line number, when the reference is on a line.
        row: Option<usize>,
    },

    /// A line carries a negative amount.
    #[error("Row {row}: amounts for account {account} cannot be negative")]
    NegativeLineAmount {
        /// 1-based line number.
        row: usize,
        /// Line account.
        account: String,
    },

    /// A line has both a debit and a credit.
    #[error("Row {row}: account {account} cannot have both debit and credit")]
    AmbiguousLineAmount {
        /// 1-based line number.
        row: usize,
        /// Line account.
        account: String,
    },

    /// A line has neither a debit nor a credit.
    #[error("Row {row}: account {account} must have either debit or credit amount")]
    EmptyLineAmount {
        /// 1-based line number.
        row: usize,
        /// Line account.
        account: String,
    },

    /// Debits and credits differ by more than the tolerance.
    #[error("Total debit ({total_debit}) must equal total credit ({total_credit})")]
    UnbalancedTransaction {
        /// Sum of debits.
        total_debit: Decimal,
        /// Sum of credits.
        total_credit: Decimal,
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

fn missing_message(field: &str, row: Option<usize>) -> String {
    match row {
        Some(row) => format!("Row {row}: {field} is required"),
        None => format!("{field} is required"),
    }
}

fn unknown_message(kind: EntityKind, name: &str, row: Option<usize>) -> String {
    match row {
        Some(row) => format!("Row {row}: {kind} {name} does not exist"),
        None => format!("{kind} {name} does not exist"),
    }
}

impl JournalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingRequiredField { .. } => "MISSING_REQUIRED_FIELD",
            Self::InsufficientLines { .. } => "INSUFFICIENT_LINES",
            Self::UnknownEntity { .. } => "UNKNOWN_ENTITY",
            Self::NegativeLineAmount { .. } => "NEGATIVE_LINE_AMOUNT",
            Self::AmbiguousLineAmount { .. } => "AMBIGUOUS_LINE_AMOUNT",
            Self::EmptyLineAmount { .. } => "EMPTY_LINE_AMOUNT",
            Self::UnbalancedTransaction { .. } => "UNBALANCED_TRANSACTION",
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

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            JournalError::MissingRequiredField {
                field: "company",
                row: None
            }
            .to_string(),
            "company is required"
        );
        assert_eq!(
            JournalError::MissingRequiredField {
                field: "account",
                row: Some(2)
            }
            .to_string(),
            "Row 2: account is required"
        );
        assert_eq!(
            JournalError::UnknownEntity {
                kind: EntityKind::Account,
                name: "Ghost".to_string(),
                row: Some(1)
            }
            .to_string(),
            "Row 1: Account Ghost does not exist"
        );
        assert_eq!(
            JournalError::UnbalancedTransaction {
                total_debit: dec!(100),
                total_credit: dec!(90)
            }
            .to_string(),
            "Total debit (100) must equal total credit (90)"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            JournalError::InsufficientLines { count: 1 }.error_code(),
            "INSUFFICIENT_LINES"
        );
        assert_eq!(
            JournalError::Field(FieldError::UnknownField {
                field: "x".to_string()
            })
            .error_code(),
            "UNKNOWN_FIELD"
        );
        assert_eq!(
            JournalError::AmountOverflow { field: "total_debit" }.error_code(),
            "AMOUNT_OVERFLOW"
        );
        assert_eq!(
            JournalError::Lookup(LookupError("down".to_string())).error_code(),
            "INFRASTRUCTURE_FAILURE"
        );
    }

    #[test]
    fn test_only_lookup_is_not_validation() {
        assert!(JournalError::InsufficientLines { count: 0 }.is_validation());
        assert!(JournalError::EmptyLineAmount {
            row: 1,
            account: "Cash".to_string()
        }
        .is_validation());
        assert!(!JournalError::Lookup(LookupError("timeout".to_string())).is_validation());
    }
}
