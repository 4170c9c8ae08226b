//! Document lifecycle shared by every document type.
//!
//! - Document types and statuses
//! - Lifecycle transitions (submit, cancel, amend)
//! - Naming series and amendment names
//! - Stored bodies and partial updates

pub mod body;
pub mod error;
pub mod naming;
pub mod service;
pub mod types;

pub use body::{DocumentBody, apply_patch};
pub use error::DocumentError;
pub use naming::{amended_name, format_name, series_key};
pub use service::LifecycleService;
pub use types::{DeleteAction, DocStatus, DocType, UpdateAction};
