//! Sales and purchase invoice routes.
//!
//! Missing customers, suppliers and items are created in the same database
//! transaction as the invoice.

use axum::Router;
use ledgerbridge_core::document::{DocType, DocumentBody};
use ledgerbridge_core::invoice::{Invoice, InvoiceError, InvoiceInput, InvoiceKind, InvoiceService};
use ledgerbridge_core::{BuildContext, DocumentDraft, EntityRefs, KnownEntities};

use super::documents::{self, DocumentRoute};
use crate::AppState;

/// Sales invoices.
pub struct SalesInvoices;

/// Purchase invoices.
pub struct PurchaseInvoices;

impl DocumentRoute for SalesInvoices {
    const DOCTYPE: DocType = DocType::SalesInvoice;
    type Input = InvoiceInput;
    type Document = Invoice;
    type Error = InvoiceError;

    fn references(input: &InvoiceInput) -> EntityRefs {
        InvoiceService::references(InvoiceKind::Sales, input)
    }

    fn build(
        input: &InvoiceInput,
        ctx: &BuildContext,
        lookup: &KnownEntities,
    ) -> Result<DocumentDraft<Invoice>, InvoiceError> {
        InvoiceService::build(InvoiceKind::Sales, input, ctx, lookup)
    }

    fn input_from(body: DocumentBody) -> Option<InvoiceInput> {
        match body {
            DocumentBody::SalesInvoice(invoice) => Some(invoice.into()),
            _ => None,
        }
    }
}

impl DocumentRoute for PurchaseInvoices {
    const DOCTYPE: DocType = DocType::PurchaseInvoice;
    type Input = InvoiceInput;
    type Document = Invoice;
    type Error = InvoiceError;

    fn references(input: &InvoiceInput) -> EntityRefs {
        InvoiceService::references(InvoiceKind::Purchase, input)
    }

    fn build(
        input: &InvoiceInput,
        ctx: &BuildContext,
        lookup: &KnownEntities,
    ) -> Result<DocumentDraft<Invoice>, InvoiceError> {
        InvoiceService::build(InvoiceKind::Purchase, input, ctx, lookup)
    }

    fn input_from(body: DocumentBody) -> Option<InvoiceInput> {
        match body {
            DocumentBody::PurchaseInvoice(invoice) => Some(invoice.into()),
            _ => None,
        }
    }
}

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    documents::routes::<SalesInvoices>("/sales-invoices")
        .merge(documents::routes::<PurchaseInvoices>("/purchase-invoices"))
}
