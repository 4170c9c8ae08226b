//! Application configuration management.

use serde::Deserialize;

use crate::types::FieldPolicy;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Host accounting platform (service account used by the redirect endpoints).
    pub platform: PlatformConfig,
    /// API access configuration.
    pub api: ApiConfig,
    /// Defaults applied when a request omits them.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Host platform configuration.
///
/// The service credentials are resolved once at startup and never re-read.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the host platform, e.g. `https://erp.example.com`.
    pub base_url: String,
    /// Login (email) of the service user.
    pub service_user: String,
    /// Password of the service user.
    pub service_password: String,
    /// Domain attribute for forwarded session cookies.
    #[serde(default)]
    pub cookie_domain: Option<String>,
    /// Timeout for the login call in seconds.
    #[serde(default = "default_platform_timeout")]
    pub timeout_secs: u64,
}

fn default_platform_timeout() -> u64 {
    10
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            service_user: "integration@example.com".to_string(),
            service_password: "change-me".to_string(),
            cookie_domain: None,
            timeout_secs: default_platform_timeout(),
        }
    }
}

/// API access configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// API key expected in `Authorization: token <key>:<secret>`.
    pub api_key: String,
    /// API secret expected in `Authorization: token <key>:<secret>`.
    pub api_secret: String,
    /// What to do with request fields no document schema recognizes.
    #[serde(default)]
    pub unknown_fields: FieldPolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: "change-me".to_string(),
            api_secret: "change-me".to_string(),
            unknown_fields: FieldPolicy::default(),
        }
    }
}

/// Defaults applied when a request omits them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultsConfig {
    /// Company used by payment entries and the General Ledger redirect.
    #[serde(default)]
    pub company: Option<String>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEDGERBRIDGE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
