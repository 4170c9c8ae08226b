//! Inputs every builder needs besides the request itself.

use chrono::NaiveDate;
use ledgerbridge_shared::types::FieldPolicy;

/// Ambient inputs to a document build.
///
/// Builders never read the clock or global configuration; both are passed in
/// here so a build is a pure function of its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// Date used when the request carries no posting date.
    pub today: NaiveDate,
    /// How unknown optional fields are handled.
    pub field_policy: FieldPolicy,
    /// Company used when a payment names none.
    pub default_company: Option<String>,
}

impl BuildContext {
    /// Context with the `ignore` field policy and no default company.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            field_policy: FieldPolicy::default(),
            default_company: None,
        }
    }

    /// Sets the field policy.
    #[must_use]
    pub fn with_policy(mut self, policy: FieldPolicy) -> Self {
        self.field_policy = policy;
        self
    }

    /// Sets the default company.
    #[must_use]
    pub fn with_default_company(mut self, company: Option<String>) -> Self {
        self.default_company = company;
        self
    }
}

/// A validated document ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentDraft<T> {
    /// The document body.
    pub document: T,
    /// Master records to create in the same transaction.
    pub masters: crate::master::MasterRecordPlan,
    /// Unknown optional fields dropped under the `ignore` policy.
    pub ignored_fields: Vec<String>,
}

impl<T> DocumentDraft<T> {
    /// Wraps a document that needs no master records.
    #[must_use]
    pub fn new(document: T) -> Self {
        Self {
            document,
            masters: crate::master::MasterRecordPlan::default(),
            ignored_fields: Vec::new(),
        }
    }
}
