//! Document lifecycle errors.

use thiserror::Error;

use super::types::{DocStatus, DocType};

/// Errors that can occur while moving a document through its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: DocStatus,
        /// The attempted target status.
        to: DocStatus,
    },

    /// Attempted to modify a cancelled document.
    #[error("{doctype} {name} is cancelled and cannot be modified")]
    CannotModifyCancelled {
        /// Document type.
        doctype: DocType,
        /// Document name.
        name: String,
    },

    /// Document not found.
    #[error("{doctype} {name} not found")]
    NotFound {
        /// Document type.
        doctype: DocType,
        /// Document name.
        name: String,
    },

    /// Stored docstatus is not 0, 1 or 2.
    #[error("Unknown docstatus {0}")]
    UnknownStatus(i16),
}

impl DocumentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::CannotModifyCancelled { .. } => "CANNOT_MODIFY_CANCELLED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::UnknownStatus(_) => "UNKNOWN_STATUS",
        }
    }
}
