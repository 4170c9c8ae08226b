//! Sales and purchase invoices.

pub mod error;
pub mod service;
pub mod types;

pub use error::InvoiceError;
pub use service::InvoiceService;
pub use types::{
    ChargeType, Invoice, InvoiceInput, InvoiceItem, InvoiceItemInput, InvoiceKind, InvoiceTax,
    InvoiceTaxInput,
};
