//! Document repository: insert, submit, amend and delete accounting documents.
//!
//! Every write runs in one database transaction together with the master
//! records its document needs, so a failed insert leaves nothing behind.

use chrono::{Datelike, Utc};
use ledgerbridge_core::document::{
    DeleteAction, DocStatus, DocType, DocumentBody, DocumentError, LifecycleService,
    UpdateAction, amended_name, format_name, series_key,
};
use ledgerbridge_core::master::MasterRecordPlan;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, Statement, TransactionTrait,
};
use uuid::Uuid;

use super::master::apply_plan;
use crate::entities::documents;

/// Increments the counter for a series key, creating it at 1.
const NEXT_IN_SERIES_SQL: &str = r"
INSERT INTO naming_series (prefix, current) VALUES ($1, 1)
ON CONFLICT (prefix) DO UPDATE SET current = naming_series.current + 1
RETURNING current
";

/// Error types for document persistence.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Lifecycle rule violated or document missing.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A stored row names a document type this service does not know.
    #[error("Unknown document type '{0}'")]
    UnknownDoctype(String),

    /// Payload could not be encoded or decoded.
    #[error("Payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Returns true if the error is the caller's doing rather than a fault.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::Document(_))
    }
}

/// A persisted document with its lifecycle metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Row identifier.
    pub id: Uuid,
    /// Document name, e.g. `ACC-JV-2026-00001`.
    pub name: String,
    /// Lifecycle status.
    pub status: DocStatus,
    /// Name of the cancelled document this one replaces.
    pub amended_from: Option<String>,
    /// The document itself.
    pub body: DocumentBody,
    /// Creation time.
    pub created_at: DateTimeWithTimeZone,
    /// Last modification time.
    pub updated_at: DateTimeWithTimeZone,
}

impl StoredDocument {
    /// Returns the document type.
    #[must_use]
    pub const fn doctype(&self) -> DocType {
        self.body.doctype()
    }
}

impl TryFrom<documents::Model> for StoredDocument {
    type Error = RepositoryError;

    fn try_from(model: documents::Model) -> Result<Self, Self::Error> {
        let doctype = DocType::parse(&model.doctype)
            .ok_or_else(|| RepositoryError::UnknownDoctype(model.doctype.clone()))?;
        let status = status_of(&model)?;
        let body = DocumentBody::from_payload(doctype, model.payload)?;

        Ok(Self {
            id: model.id,
            name: model.name,
            status,
            amended_from: model.amended_from,
            body,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Document repository.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates missing master records, names the document from its series,
    /// inserts it as a draft and submits it.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be encoded or any database
    /// operation fails. Nothing is persisted on error.
    pub async fn insert_and_submit(
        &self,
        body: &DocumentBody,
        masters: &MasterRecordPlan,
    ) -> Result<StoredDocument, RepositoryError> {
        let doctype = body.doctype();
        let payload = body.to_payload()?;

        let txn = self.db.begin().await?;

        apply_plan(&txn, masters).await?;
        let name = next_name(&txn, doctype, body.posting_date().year()).await?;
        let draft = insert_draft(&txn, body, &name, None, payload).await?;
        let submitted = transition(&txn, draft, LifecycleService::submit).await?;

        txn.commit().await?;

        tracing::info!(doctype = %doctype, name = %submitted.name, "Document submitted");
        StoredDocument::try_from(submitted)
    }

    /// Fetches a document by type and name.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NotFound` if no such document exists.
    pub async fn get(&self, doctype: DocType, name: &str) -> Result<StoredDocument, RepositoryError> {
        let model = documents::Entity::find()
            .filter(documents::Column::Doctype.eq(doctype.as_str()))
            .filter(documents::Column::Name.eq(name))
            .one(&self.db)
            .await?
            .ok_or_else(|| not_found(doctype, name))?;

        StoredDocument::try_from(model)
    }

    /// Replaces a document with a rebuilt body.
    ///
    /// A draft is overwritten and submitted. A submitted document is
    /// cancelled and the rebuilt body is inserted and submitted as its
    /// amendment. The row is locked for the whole transaction, so concurrent
    /// updates of the same document run one after the other and the loser
    /// sees the cancelled original.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NotFound` or `DocumentError::CannotModifyCancelled`
    /// for caller errors, or a database error.
    pub async fn replace(
        &self,
        name: &str,
        body: &DocumentBody,
        masters: &MasterRecordPlan,
    ) -> Result<StoredDocument, RepositoryError> {
        let doctype = body.doctype();
        let payload = body.to_payload()?;

        let txn = self.db.begin().await?;

        let current = find_locked(&txn, doctype, name).await?;
        let action = LifecycleService::plan_update(doctype, name, status_of(&current)?)?;

        apply_plan(&txn, masters).await?;

        let saved = match action {
            UpdateAction::ReplaceDraft => {
                let mut active: documents::ActiveModel = current.into();
                active.company = Set(body.company().map(str::to_string));
                active.posting_date = Set(body.posting_date());
                active.payload = Set(payload);
                active.updated_at = Set(Utc::now().into());
                let draft = active.update(&txn).await?;
                transition(&txn, draft, LifecycleService::submit).await?
            }
            UpdateAction::CancelAndAmend => {
                let is_amendment = current.amended_from.is_some();
                let cancelled = transition(&txn, current, LifecycleService::cancel).await?;
                let new_name = amended_name(&cancelled.name, is_amendment);
                let draft =
                    insert_draft(&txn, body, &new_name, Some(cancelled.name.clone()), payload)
                        .await?;
                transition(&txn, draft, LifecycleService::submit).await?
            }
        };

        txn.commit().await?;

        tracing::info!(
            doctype = %doctype,
            name,
            new_name = %saved.name,
            action = ?action,
            "Document replaced"
        );
        StoredDocument::try_from(saved)
    }

    /// Deletes a document, cancelling it first if it is submitted.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NotFound` if no such document exists, or a
    /// database error.
    pub async fn delete(&self, doctype: DocType, name: &str) -> Result<DeleteAction, RepositoryError> {
        let txn = self.db.begin().await?;

        let current = find_locked(&txn, doctype, name).await?;
        let action = LifecycleService::plan_delete(status_of(&current)?);

        let doomed = match action {
            DeleteAction::CancelThenDelete => {
                transition(&txn, current, LifecycleService::cancel).await?
            }
            DeleteAction::Delete => current,
        };

        documents::Entity::delete_by_id(doomed.id).exec(&txn).await?;

        txn.commit().await?;

        tracing::info!(doctype = %doctype, name, action = ?action, "Document deleted");
        Ok(action)
    }
}

/// Allocates the next name in the document's series.
async fn next_name<C: ConnectionTrait>(
    conn: &C,
    doctype: DocType,
    year: i32,
) -> Result<String, RepositoryError> {
    let key = series_key(doctype, year);
    let statement = Statement::from_sql_and_values(
        conn.get_database_backend(),
        NEXT_IN_SERIES_SQL,
        [key.clone().into()],
    );

    let row = conn
        .query_one(statement)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("naming series {key}")))?;
    let current: i64 = row.try_get("", "current")?;

    Ok(format_name(doctype, year, current))
}

/// Inserts a document row in Draft status.
async fn insert_draft<C: ConnectionTrait>(
    conn: &C,
    body: &DocumentBody,
    name: &str,
    amended_from: Option<String>,
    payload: serde_json::Value,
) -> Result<documents::Model, RepositoryError> {
    let now: DateTimeWithTimeZone = Utc::now().into();

    let model = documents::ActiveModel {
        id: Set(Uuid::now_v7()),
        doctype: Set(body.doctype().as_str().to_string()),
        name: Set(name.to_string()),
        docstatus: Set(DocStatus::Draft.code()),
        amended_from: Set(amended_from),
        company: Set(body.company().map(str::to_string)),
        posting_date: Set(body.posting_date()),
        payload: Set(payload),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(model.insert(conn).await?)
}

/// Loads a document and locks its row until the transaction ends.
async fn find_locked<C: ConnectionTrait>(
    conn: &C,
    doctype: DocType,
    name: &str,
) -> Result<documents::Model, RepositoryError> {
    documents::Entity::find()
        .filter(documents::Column::Doctype.eq(doctype.as_str()))
        .filter(documents::Column::Name.eq(name))
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| not_found(doctype, name))
}

/// Moves a document to the status chosen by `step` and saves it.
async fn transition<C: ConnectionTrait>(
    conn: &C,
    model: documents::Model,
    step: fn(DocStatus) -> Result<DocStatus, DocumentError>,
) -> Result<documents::Model, RepositoryError> {
    let next = step(status_of(&model)?)?;

    let mut active: documents::ActiveModel = model.into();
    active.docstatus = Set(next.code());
    active.updated_at = Set(Utc::now().into());

    Ok(active.update(conn).await?)
}

fn status_of(model: &documents::Model) -> Result<DocStatus, DocumentError> {
    DocStatus::from_code(model.docstatus).ok_or(DocumentError::UnknownStatus(model.docstatus))
}

fn not_found(doctype: DocType, name: &str) -> RepositoryError {
    RepositoryError::Document(DocumentError::NotFound {
        doctype,
        name: name.to_string(),
    })
}
