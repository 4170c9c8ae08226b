//! Core business logic for LedgerBridge.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Balanced journal entry construction
//! - `invoice` - Sales and purchase invoices
//! - `payment` - Payment entries
//! - `document` - Document lifecycle, naming and partial updates
//! - `fields` - Allow-listed optional fields
//! - `lookup` - Read-only master data access
//! - `master` - Master records created on demand

pub mod context;
pub mod document;
pub mod fields;
pub mod invoice;
pub mod ledger;
pub mod lookup;
pub mod master;
pub mod payment;

pub use context::{BuildContext, DocumentDraft};
pub use lookup::{EntityKind, EntityLookup, EntityRefs, KnownEntities, LookupError};
