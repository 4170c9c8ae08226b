//! Lifecycle service for document status transitions.
//!
//! Implements the `Draft -> Submitted -> Cancelled` state machine and
//! decides how updates and deletes must be carried out for a document in a
//! given state.

use super::error::DocumentError;
use super::types::{DeleteAction, DocStatus, DocType, UpdateAction};

/// Stateless service for document lifecycle transitions.
pub struct LifecycleService;

impl LifecycleService {
    /// Submit a draft document.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::InvalidTransition` if not in Draft status.
    pub fn submit(current: DocStatus) -> Result<DocStatus, DocumentError> {
        match current {
            DocStatus::Draft => Ok(DocStatus::Submitted),
            _ => Err(DocumentError::InvalidTransition {
                from: current,
                to: DocStatus::Submitted,
            }),
        }
    }

    /// Cancel a submitted document.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::InvalidTransition` if not in Submitted status.
    pub fn cancel(current: DocStatus) -> Result<DocStatus, DocumentError> {
        match current {
            DocStatus::Submitted => Ok(DocStatus::Cancelled),
            _ => Err(DocumentError::InvalidTransition {
                from: current,
                to: DocStatus::Cancelled,
            }),
        }
    }

    /// Decide how to apply an update to a document.
    ///
    /// Drafts are overwritten; submitted documents are cancelled and
    /// replaced by an amendment; cancelled documents are final.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::CannotModifyCancelled` for cancelled documents.
    pub fn plan_update(
        doctype: DocType,
        name: &str,
        current: DocStatus,
    ) -> Result<UpdateAction, DocumentError> {
        match current {
            DocStatus::Draft => Ok(UpdateAction::ReplaceDraft),
            DocStatus::Submitted => Ok(UpdateAction::CancelAndAmend),
            DocStatus::Cancelled => Err(DocumentError::CannotModifyCancelled {
                doctype,
                name: name.to_string(),
            }),
        }
    }

    /// Decide how to delete a document.
    #[must_use]
    pub fn plan_delete(current: DocStatus) -> DeleteAction {
        match current {
            DocStatus::Submitted => DeleteAction::CancelThenDelete,
            DocStatus::Draft | DocStatus::Cancelled => DeleteAction::Delete,
        }
    }

    /// Check if a status transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: DocStatus, to: DocStatus) -> bool {
        matches!(
            (from, to),
            (DocStatus::Draft, DocStatus::Submitted) | (DocStatus::Submitted, DocStatus::Cancelled)
        )
    }
}
