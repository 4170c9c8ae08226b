//! Read-only access to master data.
//!
//! Builders never talk to the database. They ask an `EntityLookup` whether a
//! company, account, customer (and so on) exists. The persistence layer
//! prefetches everything a request references into a `KnownEntities`
//! snapshot, so builders stay synchronous and pure.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::master::CompanyDefaults;

/// Kinds of master record a document can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// Accounting entity owning the books.
    Company,
    /// Ledger account in the chart of accounts.
    Account,
    /// Cost center.
    #[serde(rename = "Cost Center")]
    CostCenter,
    /// Customer master.
    Customer,
    /// Supplier master.
    Supplier,
    /// Item master.
    Item,
}

impl EntityKind {
    /// Returns the display name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::Account => "Account",
            Self::CostCenter => "Cost Center",
            Self::Customer => "Customer",
            Self::Supplier => "Supplier",
            Self::Item => "Item",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The entity store itself failed (network, database).
///
/// This is never a validation outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Entity lookup failed: {0}")]
pub struct LookupError(pub String);

/// Read-only existence checks against the entity store.
pub trait EntityLookup {
    /// Returns true if a record of `kind` named `name` exists.
    fn exists(&self, kind: EntityKind, name: &str) -> Result<bool, LookupError>;

    /// Returns the posting defaults of a company, if known.
    fn company_defaults(&self, _company: &str) -> Result<Option<CompanyDefaults>, LookupError> {
        Ok(None)
    }
}

impl<F> EntityLookup for F
where
    F: Fn(EntityKind, &str) -> Result<bool, LookupError>,
{
    fn exists(&self, kind: EntityKind, name: &str) -> Result<bool, LookupError> {
        self(kind, name)
    }
}

/// In-memory snapshot of existing master records.
#[derive(Debug, Clone, Default)]
pub struct KnownEntities {
    entries: HashSet<(EntityKind, String)>,
    companies: HashMap<String, CompanyDefaults>,
}

impl KnownEntities {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity and returns the snapshot (builder style).
    #[must_use]
    pub fn with(mut self, kind: EntityKind, name: impl Into<String>) -> Self {
        self.insert(kind, name);
        self
    }

    /// Adds a company together with its posting defaults.
    #[must_use]
    pub fn with_company(mut self, defaults: CompanyDefaults) -> Self {
        self.insert_company(defaults);
        self
    }

    /// Adds an entity.
    pub fn insert(&mut self, kind: EntityKind, name: impl Into<String>) {
        self.entries.insert((kind, name.into()));
    }

    /// Adds a company together with its posting defaults.
    pub fn insert_company(&mut self, defaults: CompanyDefaults) {
        self.entries
            .insert((EntityKind::Company, defaults.name.clone()));
        self.companies.insert(defaults.name.clone(), defaults);
    }

    /// Returns true if the entity is in the snapshot.
    #[must_use]
    pub fn contains(&self, kind: EntityKind, name: &str) -> bool {
        self.entries.contains(&(kind, name.to_string()))
    }

    /// Number of entities in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntityLookup for KnownEntities {
    fn exists(&self, kind: EntityKind, name: &str) -> Result<bool, LookupError> {
        Ok(self.contains(kind, name))
    }

    fn company_defaults(&self, company: &str) -> Result<Option<CompanyDefaults>, LookupError> {
        Ok(self.companies.get(company).cloned())
    }
}

/// Trims a name and treats blank as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Names a request references, grouped by kind.
///
/// Used by the persistence layer to prefetch a `KnownEntities` snapshot in
/// one query per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityRefs {
    refs: BTreeSet<(EntityKind, String)>,
}

impl EntityRefs {
    /// Creates an empty set of references.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a reference. Blank names are skipped.
    pub fn add(&mut self, kind: EntityKind, name: Option<&str>) {
        if let Some(name) = non_blank(name) {
            self.refs.insert((kind, name.to_string()));
        }
    }

    /// Returns the referenced names of one kind, sorted.
    #[must_use]
    pub fn names(&self, kind: EntityKind) -> Vec<String> {
        self.refs
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Returns true if nothing is referenced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}
