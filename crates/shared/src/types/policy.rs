//! Policy for request fields that a document schema does not recognize.

use serde::{Deserialize, Serialize};

/// How unrecognized request fields are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldPolicy {
    /// Drop unknown fields and log them.
    #[default]
    Ignore,
    /// Fail the request when an unknown field is present.
    Reject,
}

impl FieldPolicy {
    /// Returns the string representation of the policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Reject => "reject",
        }
    }
}
