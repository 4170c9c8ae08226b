//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod document;
pub mod master;

pub use document::{DocumentRepository, RepositoryError, StoredDocument};
pub use master::MasterRepository;
