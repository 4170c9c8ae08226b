//! Payment entry routes.

use axum::Router;
use ledgerbridge_core::document::{DocType, DocumentBody};
use ledgerbridge_core::payment::{PaymentEntry, PaymentEntryInput, PaymentError, PaymentService};
use ledgerbridge_core::{BuildContext, DocumentDraft, EntityRefs, KnownEntities};

use super::documents::{self, DocumentRoute};
use crate::AppState;

/// Payment entries.
pub struct PaymentEntries;

impl DocumentRoute for PaymentEntries {
    const DOCTYPE: DocType = DocType::PaymentEntry;
    type Input = PaymentEntryInput;
    type Document = PaymentEntry;
    type Error = PaymentError;

    fn references(input: &PaymentEntryInput) -> EntityRefs {
        PaymentService::references(input)
    }

    fn build(
        input: &PaymentEntryInput,
        ctx: &BuildContext,
        lookup: &KnownEntities,
    ) -> Result<DocumentDraft<PaymentEntry>, PaymentError> {
        PaymentService::build(input, ctx, lookup)
    }

    fn input_from(body: DocumentBody) -> Option<PaymentEntryInput> {
        match body {
            DocumentBody::PaymentEntry(payment) => Some(payment.into()),
            _ => None,
        }
    }
}

/// Creates the payment entry routes.
pub fn routes() -> Router<AppState> {
    documents::routes::<PaymentEntries>("/payment-entries")
}
