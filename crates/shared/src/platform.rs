//! Session client for the host accounting platform.
//!
//! Logs in as the configured service user and builds the deep links the
//! redirect endpoints send browsers to. Uses `reqwest` for HTTP.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use thiserror::Error;

use crate::config::PlatformConfig;

/// Path of the host platform's password login method.
const LOGIN_PATH: &str = "/api/method/login";

/// Platform client errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The configured base URL cannot be parsed.
    #[error("Invalid platform URL: {0}")]
    InvalidUrl(String),
    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
    /// The login request did not reach the platform.
    #[error("Login request failed: {0}")]
    Transport(String),
    /// The platform refused the service credentials.
    #[error("Platform rejected service login with status {0}")]
    LoginRejected(u16),
    /// The platform answered without a session cookie.
    #[error("Platform login returned no session cookie")]
    MissingSession,
}

/// A cookie returned by the platform login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    /// Cookie name (e.g. `sid`).
    pub name: String,
    /// Cookie value.
    pub value: String,
}

/// An authenticated platform session.
#[derive(Debug, Clone)]
pub struct PlatformSession {
    /// All cookies set by the login response.
    pub cookies: Vec<SessionCookie>,
}

impl PlatformSession {
    /// Returns the session id cookie value.
    #[must_use]
    pub fn sid(&self) -> Option<&str> {
        self.cookies
            .iter()
            .find(|c| c.name == "sid")
            .map(|c| c.value.as_str())
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    usr: &'a str,
    pwd: &'a str,
}

/// Client for the host platform.
#[derive(Clone)]
pub struct PlatformClient {
    client: Client,
    base_url: Url,
    config: PlatformConfig,
}

impl std::fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformClient")
            .field("base_url", &self.base_url.as_str())
            .field("service_user", &self.config.service_user)
            .finish_non_exhaustive()
    }
}

impl PlatformClient {
    /// Creates a new platform client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: PlatformConfig) -> Result<Self, PlatformError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| PlatformError::InvalidUrl(format!("{}: {e}", config.base_url)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PlatformError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Returns the cookie domain to use when forwarding session cookies.
    #[must_use]
    pub fn cookie_domain(&self) -> Option<&str> {
        self.config.cookie_domain.as_deref()
    }

    /// Logs in as the service user.
    ///
    /// This is a one-shot credential exchange and is never retried.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the platform rejects the
    /// credentials, or no session cookie comes back.
    pub async fn login(&self) -> Result<PlatformSession, PlatformError> {
        let url = self.url_for(LOGIN_PATH)?;

        let response = self
            .client
            .post(url)
            .json(&LoginRequest {
                usr: &self.config.service_user,
                pwd: &self.config.service_password,
            })
            .send()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(PlatformError::LoginRejected(status.as_u16()));
        }

        let cookies: Vec<SessionCookie> = response
            .cookies()
            .map(|c| SessionCookie {
                name: c.name().to_string(),
                value: c.value().to_string(),
            })
            .collect();

        let session = PlatformSession { cookies };
        if session.sid().is_none() {
            return Err(PlatformError::MissingSession);
        }

        tracing::debug!(
            user = %self.config.service_user,
            cookies = session.cookies.len(),
            "Service user logged in to platform"
        );

        Ok(session)
    }

    /// Builds the URL of the General Ledger report with the given filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn general_ledger_url<'a, I>(&self, filters: I) -> Result<Url, PlatformError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.report_url("General Ledger", filters)
    }

    /// Builds the URL of a query report with the given filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn report_url<'a, I>(&self, report: &str, filters: I) -> Result<Url, PlatformError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut url = self.url_for(&format!("/app/query-report/{report}"))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in filters {
                pairs.append_pair(key, value);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    /// Builds the URL of a module workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn module_url(&self, module: &str) -> Result<Url, PlatformError> {
        self.url_for(&format!("/app/{module}"))
    }

    fn url_for(&self, path: &str) -> Result<Url, PlatformError> {
        self.base_url
            .join(path)
            .map_err(|e| PlatformError::InvalidUrl(format!("{path}: {e}")))
    }
}
