//! `SeaORM` entity definitions.
//!
//! Master tables are keyed by their display name, which is how documents
//! reference them.

pub mod accounts;
pub mod companies;
pub mod cost_centers;
pub mod customers;
pub mod documents;
pub mod items;
pub mod naming_series;
pub mod suppliers;
