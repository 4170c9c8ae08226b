//! Payment entries.

pub mod error;
pub mod service;
pub mod types;

pub use error::PaymentError;
pub use service::PaymentService;
pub use types::{
    PartyType, PaymentEntry, PaymentEntryInput, PaymentReference, PaymentReferenceInput,
    PaymentType,
};
