//! Double-entry journal entries.
//!
//! This module implements the balanced-transaction builder:
//! - Input and Draft payload types
//! - Error types for journal construction
//! - Journal service that validates and assembles entries

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::JournalError;
pub use service::{JournalService, MIN_LINES};
pub use types::{
    JournalEntry, JournalEntryInput, JournalLine, JournalLineInput, JournalTotals, VoucherKind,
};
