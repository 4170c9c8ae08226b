//! Journal entry routes.
//!
//! `POST /journal-entries` builds a balanced entry from its lines and
//! submits it; the response carries the debit and credit totals.

use axum::Router;
use ledgerbridge_core::document::{DocType, DocumentBody};
use ledgerbridge_core::ledger::{
    JournalEntry, JournalEntryInput, JournalError, JournalService, JournalTotals,
};
use ledgerbridge_core::{BuildContext, DocumentDraft, EntityRefs, KnownEntities};

use super::documents::{self, DocumentRoute};
use crate::AppState;

/// Journal entries.
pub struct JournalEntries;

impl DocumentRoute for JournalEntries {
    const DOCTYPE: DocType = DocType::JournalEntry;
    type Input = JournalEntryInput;
    type Document = JournalEntry;
    type Error = JournalError;

    fn references(input: &JournalEntryInput) -> EntityRefs {
        JournalService::references(input)
    }

    fn build(
        input: &JournalEntryInput,
        ctx: &BuildContext,
        lookup: &KnownEntities,
    ) -> Result<DocumentDraft<JournalEntry>, JournalError> {
        JournalService::build(input, ctx, lookup)
    }

    fn input_from(body: DocumentBody) -> Option<JournalEntryInput> {
        match body {
            DocumentBody::JournalEntry(entry) => Some(entry.into()),
            _ => None,
        }
    }

    fn totals(document: &JournalEntry) -> Option<JournalTotals> {
        Some(document.totals())
    }
}

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    documents::routes::<JournalEntries>("/journal-entries")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_router;
    use crate::routes::test_support::{AUTH, body_json, test_state};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::AUTHORIZATION};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_malformed_body_is_validation_envelope() {
        let app = create_router(test_state("http://127.0.0.1:9"));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/journal-entries")
                    .header(AUTHORIZATION, AUTH)
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"company": "Acme Ltd", "lines": "#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["code"], "INVALID_JSON");
    }

    #[tokio::test]
    async fn test_wrong_amount_type_is_validation_envelope() {
        let app = create_router(test_state("http://127.0.0.1:9"));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/journal-entries")
                    .header(AUTHORIZATION, AUTH)
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"company": "Acme Ltd", "lines": [{"account": "Cash", "debit_amount": true}]}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["code"], "INVALID_JSON");
    }

    #[tokio::test]
    async fn test_requires_auth() {
        let app = create_router(test_state("http://127.0.0.1:9"));

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/journal-entries/ACC-JV-2026-00001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_database_outage_is_server_error() {
        let app = create_router(test_state("http://127.0.0.1:9"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/journal-entries/ACC-JV-2026-00001")
                    .header(AUTHORIZATION, AUTH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["code"], "DATABASE_ERROR");
    }
}
