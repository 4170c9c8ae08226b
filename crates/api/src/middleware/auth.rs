//! API key authentication for protected routes.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use ledgerbridge_shared::AppError;
use subtle::ConstantTimeEq;

use crate::AppState;
use crate::error::ApiError;

/// Extracts `(key, secret)` from a `token <key>:<secret>` header value.
fn extract_token(header: &str) -> Option<(&str, &str)> {
    header
        .strip_prefix("token ")
        .or_else(|| header.strip_prefix("Token "))?
        .trim()
        .split_once(':')
}

/// Compares both halves of the credentials in constant time.
fn credentials_match(key: &str, secret: &str, expected_key: &str, expected_secret: &str) -> bool {
    let key_ok = key.as_bytes().ct_eq(expected_key.as_bytes());
    let secret_ok = secret.as_bytes().ct_eq(expected_secret.as_bytes());
    (key_ok & secret_ok).into()
}

/// Authentication middleware that checks the API key and secret.
///
/// Requests without a `token` Authorization header, or with credentials
/// that do not match the configured pair, are answered with 401.
pub async fn auth_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some((key, secret)) = auth_header.and_then(extract_token) else {
        return ApiError::new(
            AppError::Unauthorized(
                "Authorization header with token <api_key>:<api_secret> is required".to_string(),
            ),
            "MISSING_TOKEN",
        )
        .into_response();
    };

    if !credentials_match(key, secret, &state.api.api_key, &state.api.api_secret) {
        tracing::warn!("Rejected request with invalid API credentials");
        return ApiError::new(
            AppError::Unauthorized("Invalid API key or secret".to_string()),
            "INVALID_TOKEN",
        )
        .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{body_json, test_state};
    use axum::{Router, body::Body, http::StatusCode, middleware::from_fn_with_state, routing::get};
    use rstest::rstest;
    use tower::ServiceExt;

    #[rstest]
    #[case("token key:secret", Some(("key", "secret")))]
    #[case("Token key:secret", Some(("key", "secret")))]
    #[case("token key:sec:ret", Some(("key", "sec:ret")))]
    #[case("Bearer abc", None)]
    #[case("token keyonly", None)]
    fn test_extract_token(#[case] header: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(extract_token(header), expected);
    }

    #[rstest]
    #[case("test-key", "test-secret", true)]
    #[case("test-key", "wrong", false)]
    #[case("other-key", "test-secret", false)]
    #[case("test-ke", "test-secret", false)]
    #[case("", "", false)]
    fn test_credentials_match(#[case] key: &str, #[case] secret: &str, #[case] expected: bool) {
        assert_eq!(
            credentials_match(key, secret, "test-key", "test-secret"),
            expected
        );
    }

    fn app() -> Router {
        let state = test_state("http://127.0.0.1:9");
        Router::new()
            .route("/protected", get(|| async { "ok" }))
            .layer(from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state)
    }

    async fn call(header: Option<&str>) -> axum::response::Response {
        let mut builder = axum::http::Request::builder().uri("/protected");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        app().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let response = call(None).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["code"], "MISSING_TOKEN");
    }

    #[tokio::test]
    async fn test_wrong_secret_is_unauthorized() {
        let response = call(Some("token test-key:wrong")).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_wrong_key_is_unauthorized() {
        let response = call(Some("token other-key:test-secret")).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_valid_token_passes() {
        let response = call(Some("token test-key:test-secret")).await;

        assert_eq!(response.status(), StatusCode::OK);
    }
}
