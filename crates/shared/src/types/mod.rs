//! Common types used across the application.

pub mod money;
pub mod policy;

pub use money::{
    BALANCE_TOLERANCE, CURRENCY_PRECISION, percentage_of, round_currency, within_tolerance,
};
pub use policy::FieldPolicy;
