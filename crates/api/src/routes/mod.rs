//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod documents;
pub mod health;
pub mod invoices;
pub mod journal_entries;
pub mod payment_entries;
pub mod redirect;

#[cfg(test)]
pub(crate) mod test_support;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Everything except health requires an API key
    let protected_routes = Router::new()
        .merge(invoices::routes())
        .merge(payment_entries::routes())
        .merge(journal_entries::routes())
        .merge(redirect::routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}
