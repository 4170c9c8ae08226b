//! Fixtures for route tests.

use std::sync::Arc;

use axum::body::Body;
use axum::response::Response;
use http_body_util::BodyExt;
use ledgerbridge_shared::{ApiConfig, DefaultsConfig, PlatformClient, PlatformConfig};
use sea_orm::DatabaseConnection;

use crate::AppState;

pub const AUTH: &str = "token test-key:test-secret";

/// State with no database behind it and the platform at `platform_url`.
pub fn test_state(platform_url: &str) -> AppState {
    let platform = PlatformClient::new(PlatformConfig {
        base_url: platform_url.to_string(),
        service_user: "svc@example.com".to_string(),
        service_password: "svc-password".to_string(),
        cookie_domain: None,
        timeout_secs: 5,
    })
    .expect("platform client should build");

    AppState {
        db: Arc::new(DatabaseConnection::Disconnected),
        platform: Arc::new(platform),
        api: Arc::new(ApiConfig {
            api_key: "test-key".to_string(),
            api_secret: "test-secret".to_string(),
            ..ApiConfig::default()
        }),
        defaults: Arc::new(DefaultsConfig {
            company: Some("Acme Ltd".to_string()),
        }),
    }
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
