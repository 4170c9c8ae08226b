//! Error envelope for every failed request.
//!
//! Failures are answered as `{status: "error", message, code}`. Caller-input
//! errors keep HTTP 200 so clients read them as data; authentication and
//! infrastructure failures change the transport status.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ledgerbridge_core::document::DocumentError;
use ledgerbridge_core::invoice::InvoiceError;
use ledgerbridge_core::ledger::JournalError;
use ledgerbridge_core::payment::PaymentError;
use ledgerbridge_db::RepositoryError;
use ledgerbridge_shared::{AppError, PlatformError};
use sea_orm::DbErr;
use serde::Serialize;

/// A failed request: its category and the code reported to the caller.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    code: &'static str,
}

/// Body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope<'a> {
    /// Always `"error"`.
    pub status: &'static str,
    /// Human-readable message.
    pub message: &'a str,
    /// Machine-readable code.
    pub code: &'a str,
}

impl ApiError {
    /// Creates an error with an explicit code.
    #[must_use]
    pub const fn new(error: AppError, code: &'static str) -> Self {
        Self { error, code }
    }

    /// Returns the code reported to the caller.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Returns the HTTP status of the response.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Returns the message reported to the caller.
    #[must_use]
    pub fn message(&self) -> &str {
        self.error.message()
    }

    fn domain(is_validation: bool, code: &'static str, message: String) -> Self {
        if is_validation {
            Self::new(AppError::Validation(message), code)
        } else {
            Self::new(AppError::Internal(message), code)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.error.is_fatal() {
            tracing::error!(code = self.code, error = %self.error, "Request failed");
        } else {
            tracing::info!(code = self.code, message = self.message(), "Request rejected");
        }

        let body = ErrorEnvelope {
            status: "error",
            message: self.message(),
            code: self.code,
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        let code = error.error_code();
        Self::new(error, code)
    }
}

impl From<JournalError> for ApiError {
    fn from(error: JournalError) -> Self {
        Self::domain(error.is_validation(), error.error_code(), error.to_string())
    }
}

impl From<InvoiceError> for ApiError {
    fn from(error: InvoiceError) -> Self {
        Self::domain(error.is_validation(), error.error_code(), error.to_string())
    }
}

impl From<PaymentError> for ApiError {
    fn from(error: PaymentError) -> Self {
        Self::domain(error.is_validation(), error.error_code(), error.to_string())
    }
}

impl From<DocumentError> for ApiError {
    fn from(error: DocumentError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let error = match error {
            DocumentError::NotFound { .. } => AppError::NotFound(message),
            DocumentError::CannotModifyCancelled { .. } | DocumentError::InvalidTransition { .. } => {
                AppError::Conflict(message)
            }
            DocumentError::UnknownStatus(_) => AppError::Internal(message),
        };
        Self::new(error, code)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Document(e) => e.into(),
            RepositoryError::Database(e) => e.into(),
            RepositoryError::UnknownDoctype(_) | RepositoryError::Serialization(_) => {
                Self::new(AppError::Internal(error.to_string()), "CORRUPT_DOCUMENT")
            }
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(error: DbErr) -> Self {
        AppError::Database(error.to_string()).into()
    }
}

impl From<PlatformError> for ApiError {
    fn from(error: PlatformError) -> Self {
        Self::new(
            AppError::ExternalService(error.to_string()),
            "PLATFORM_LOGIN_FAILED",
        )
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(AppError::Validation(rejection.body_text()), "INVALID_JSON")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(AppError::Validation(rejection.body_text()), "INVALID_QUERY")
    }
}
