//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - Document CRUD routes for invoices, payments and journal entries
//! - Redirect routes into the host platform
//! - API key authentication middleware
//! - Request extractors and response envelopes

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;

use axum::Router;
use axum::http::header::AUTHORIZATION;
use chrono::Utc;
use ledgerbridge_core::BuildContext;
use ledgerbridge_db::{DocumentRepository, MasterRepository};
use ledgerbridge_shared::{ApiConfig, DefaultsConfig, PlatformClient};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

/// Largest request body accepted, in bytes.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Client for the host platform (redirect endpoints).
    pub platform: Arc<PlatformClient>,
    /// API credentials and field policy.
    pub api: Arc<ApiConfig>,
    /// Defaults applied when requests omit them.
    pub defaults: Arc<DefaultsConfig>,
}

impl AppState {
    /// Build inputs for a request handled now.
    #[must_use]
    pub fn build_context(&self) -> BuildContext {
        BuildContext::new(Utc::now().date_naive())
            .with_policy(self.api.unknown_fields)
            .with_default_company(self.defaults.company.clone())
    }

    /// Document repository over the shared pool.
    #[must_use]
    pub fn documents(&self) -> DocumentRepository {
        DocumentRepository::new((*self.db).clone())
    }

    /// Master data repository over the shared pool.
    #[must_use]
    pub fn masters(&self) -> MasterRepository {
        MasterRepository::new((*self.db).clone())
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(SetSensitiveRequestHeadersLayer::new([AUTHORIZATION]))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
