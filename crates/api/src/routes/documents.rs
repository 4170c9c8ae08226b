//! Create, read, update and delete handlers shared by every document type.
//!
//! Each document type implements `DocumentRoute` and mounts these handlers
//! with `routes::<T>(path)`. Every write goes through the same steps:
//! prefetch the referenced master data, build the document, then hand it
//! to the repository to insert and submit (or cancel and amend).

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use ledgerbridge_core::document::{DocType, DocumentBody, LifecycleService, apply_patch};
use ledgerbridge_core::ledger::JournalTotals;
use ledgerbridge_core::{BuildContext, DocumentDraft, EntityKind, EntityRefs, KnownEntities};
use ledgerbridge_db::StoredDocument;
use ledgerbridge_shared::AppError;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::response::{DataResponse, MessageResponse, SavedResponse};

/// A document type served over HTTP.
pub trait DocumentRoute: Send + Sync + 'static {
    /// Document type handled.
    const DOCTYPE: DocType;

    /// Request body of a create, and the base a partial update patches.
    type Input: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Built document.
    type Document: Into<DocumentBody> + Send;

    /// Build failure.
    type Error: Into<ApiError>;

    /// Names the input references, for prefetching.
    fn references(input: &Self::Input) -> EntityRefs;

    /// Validates the input and builds the document.
    fn build(
        input: &Self::Input,
        ctx: &BuildContext,
        lookup: &KnownEntities,
    ) -> Result<DocumentDraft<Self::Document>, Self::Error>;

    /// Recovers the input a stored document was built from.
    fn input_from(body: DocumentBody) -> Option<Self::Input>;

    /// Totals reported alongside the document name.
    fn totals(_document: &Self::Document) -> Option<JournalTotals> {
        None
    }
}

/// Mounts the handlers for `D` under `path`.
pub fn routes<D: DocumentRoute>(path: &str) -> Router<AppState> {
    Router::new().route(path, post(create::<D>)).route(
        &format!("{path}/{{name}}"),
        get(fetch::<D>).put(update::<D>).delete(remove::<D>),
    )
}

/// POST - Build, insert and submit a document.
async fn create<D: DocumentRoute>(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<D::Input>,
) -> Result<Json<SavedResponse>, ApiError> {
    let draft = prepare::<D>(&state, &input).await?;
    let totals = D::totals(&draft.document);

    let stored = state
        .documents()
        .insert_and_submit(&draft.document.into(), &draft.masters)
        .await?;

    info!(doctype = %D::DOCTYPE, name = %stored.name, "Document created");
    Ok(Json(
        SavedResponse::created(D::DOCTYPE, stored.name).with_totals(totals),
    ))
}

/// GET - Fetch a document by name.
async fn fetch<D: DocumentRoute>(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DataResponse>, ApiError> {
    let stored = state.documents().get(D::DOCTYPE, &name).await?;
    Ok(Json(DataResponse::new(document_data(&stored)?)))
}

/// PUT - Apply a partial update and resubmit.
///
/// Top-level keys of the patch replace the stored values; `null` removes
/// an optional field. A submitted document is cancelled and replaced by an
/// amendment, whose name is returned.
async fn update<D: DocumentRoute>(
    State(state): State<AppState>,
    Path(name): Path<String>,
    ApiJson(patch): ApiJson<Map<String, Value>>,
) -> Result<Json<SavedResponse>, ApiError> {
    let documents = state.documents();

    let stored = documents.get(D::DOCTYPE, &name).await?;
    LifecycleService::plan_update(D::DOCTYPE, &name, stored.status)?;

    let base = D::input_from(stored.body).ok_or_else(|| {
        ApiError::new(
            AppError::Internal(format!("{name} is not a {}", D::DOCTYPE)),
            "CORRUPT_DOCUMENT",
        )
    })?;
    let input = apply_patch(&base, &patch)
        .map_err(|e| ApiError::new(AppError::Validation(e.to_string()), "INVALID_PATCH"))?;

    let draft = prepare::<D>(&state, &input).await?;
    let totals = D::totals(&draft.document);

    let saved = documents
        .replace(&name, &draft.document.into(), &draft.masters)
        .await?;

    info!(doctype = %D::DOCTYPE, name, new_name = %saved.name, "Document updated");
    Ok(Json(
        SavedResponse::updated(D::DOCTYPE, saved.name).with_totals(totals),
    ))
}

/// DELETE - Cancel if needed, then delete.
async fn remove<D: DocumentRoute>(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.documents().delete(D::DOCTYPE, &name).await?;
    Ok(Json(MessageResponse::deleted(D::DOCTYPE)))
}

/// Prefetches master data and builds the document.
async fn prepare<D: DocumentRoute>(
    state: &AppState,
    input: &D::Input,
) -> Result<DocumentDraft<D::Document>, ApiError> {
    let ctx = state.build_context();

    let mut refs = D::references(input);
    refs.add(EntityKind::Company, ctx.default_company.as_deref());
    let known = state.masters().snapshot(&refs).await?;

    let draft = D::build(input, &ctx, &known).map_err(Into::<ApiError>::into)?;
    if !draft.ignored_fields.is_empty() {
        warn!(
            doctype = %D::DOCTYPE,
            fields = ?draft.ignored_fields,
            "Ignored unknown fields"
        );
    }
    Ok(draft)
}

/// The stored body with its lifecycle metadata on top.
fn document_data(stored: &StoredDocument) -> Result<Value, ApiError> {
    let mut data = stored.body.to_payload().map_err(|e| {
        ApiError::new(AppError::Internal(e.to_string()), "CORRUPT_DOCUMENT")
    })?;

    if let Value::Object(fields) = &mut data {
        fields.insert("name".to_string(), Value::from(stored.name.clone()));
        fields.insert("doctype".to_string(), Value::from(stored.doctype().as_str()));
        fields.insert("docstatus".to_string(), Value::from(stored.status.code()));
        fields.insert("status".to_string(), Value::from(stored.status.as_str()));
        fields.insert(
            "amended_from".to_string(),
            stored.amended_from.clone().map_or(Value::Null, Value::from),
        );
        fields.insert("creation".to_string(), Value::from(stored.created_at.to_rfc3339()));
        fields.insert("modified".to_string(), Value::from(stored.updated_at.to_rfc3339()));
    }
    Ok(data)
}
