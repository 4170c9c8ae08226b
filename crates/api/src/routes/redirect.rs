//! Redirects into the host platform's web UI.
//!
//! Each request logs in as the service user, hands the session cookies to
//! the browser and sends it to a report or module page with `303 See Other`.

use axum::{
    Router,
    extract::{Path, State},
    response::Redirect,
    routing::get,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::{Months, NaiveDate};
use ledgerbridge_shared::{AppError, PlatformSession};
use serde::Deserialize;
use tracing::info;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::ApiQuery;

/// Creates the redirect routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/redirect/general-ledger", get(general_ledger))
        .route("/redirect/module/{module}", get(module))
}

/// General Ledger filters.
#[derive(Debug, Default, Deserialize)]
pub struct GeneralLedgerQuery {
    /// Company; defaults to the configured company.
    pub company: Option<String>,
    /// Start of the period; defaults to one month before `to_date`.
    pub from_date: Option<NaiveDate>,
    /// End of the period; defaults to today.
    pub to_date: Option<NaiveDate>,
    /// Restrict to one account.
    pub account: Option<String>,
    /// Party type of `party`.
    pub party_type: Option<String>,
    /// Restrict to one party.
    pub party: Option<String>,
    /// Grouping, e.g. `Group by Voucher (Consolidated)`.
    pub group_by: Option<String>,
}

impl GeneralLedgerQuery {
    /// Report filters in query order, with defaults filled in.
    fn filters(&self, default_company: Option<&str>, today: NaiveDate) -> Vec<(&'static str, String)> {
        let to_date = self.to_date.unwrap_or(today);
        let from_date = self
            .from_date
            .or_else(|| to_date.checked_sub_months(Months::new(1)))
            .unwrap_or(to_date);

        let mut filters = Vec::new();
        if let Some(company) = self.company.as_deref().or(default_company) {
            filters.push(("company", company.to_string()));
        }
        filters.push(("from_date", from_date.to_string()));
        filters.push(("to_date", to_date.to_string()));

        for (key, value) in [
            ("account", &self.account),
            ("party_type", &self.party_type),
            ("party", &self.party),
            ("group_by", &self.group_by),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                filters.push((key, value.to_string()));
            }
        }
        filters
    }
}

/// GET - Open the General Ledger report.
async fn general_ledger(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<GeneralLedgerQuery>,
) -> Result<(CookieJar, Redirect), ApiError> {
    let ctx = state.build_context();
    let filters = query.filters(ctx.default_company.as_deref(), ctx.today);

    let url = state
        .platform
        .general_ledger_url(filters.iter().map(|(k, v)| (*k, v.as_str())))?;
    let session = state.platform.login().await?;

    info!(target_url = %url, "Redirecting to General Ledger");
    Ok((session_jar(&state, session), Redirect::to(url.as_str())))
}

/// GET - Open a module workspace.
async fn module(
    State(state): State<AppState>,
    Path(module): Path<String>,
) -> Result<(CookieJar, Redirect), ApiError> {
    if !is_module_slug(&module) {
        return Err(ApiError::new(
            AppError::Validation(format!("Invalid module '{module}'")),
            "INVALID_MODULE",
        ));
    }

    let url = state.platform.module_url(&module)?;
    let session = state.platform.login().await?;

    info!(target_url = %url, "Redirecting to module");
    Ok((session_jar(&state, session), Redirect::to(url.as_str())))
}

/// Cookies that carry the platform session into the browser.
fn session_jar(state: &AppState, session: PlatformSession) -> CookieJar {
    let domain = state.platform.cookie_domain().map(str::to_string);

    session
        .cookies
        .into_iter()
        .fold(CookieJar::new(), |jar, cookie| {
            let mut builder = Cookie::build((cookie.name, cookie.value)).path("/");
            if let Some(domain) = domain.clone() {
                builder = builder.domain(domain);
            }
            jar.add(builder)
        })
}

fn is_module_slug(module: &str) -> bool {
    !module.is_empty()
        && module
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_router;
    use crate::routes::test_support::{AUTH, body_json, test_state};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use rstest::rstest;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn platform_accepting_login() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/method/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Set-Cookie", "sid=abc123; Path=/")
                    .set_body_json(serde_json::json!({"message": "Logged In"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, AUTH)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_filters_default_to_last_month() {
        let query = GeneralLedgerQuery::default();

        let filters = query.filters(Some("Acme Ltd"), date(2026, 3, 31));

        assert_eq!(
            filters,
            vec![
                ("company", "Acme Ltd".to_string()),
                ("from_date", "2026-02-28".to_string()),
                ("to_date", "2026-03-31".to_string()),
            ]
        );
    }

    #[test]
    fn test_filters_keep_explicit_values() {
        let query = GeneralLedgerQuery {
            company: Some("Initech".to_string()),
            from_date: Some(date(2026, 1, 1)),
            to_date: Some(date(2026, 1, 31)),
            account: Some("Cash".to_string()),
            party: Some(" ".to_string()),
            ..Default::default()
        };

        let filters = query.filters(Some("Acme Ltd"), date(2026, 3, 31));

        assert_eq!(filters[0], ("company", "Initech".to_string()));
        assert_eq!(filters[1], ("from_date", "2026-01-01".to_string()));
        assert!(filters.contains(&("account", "Cash".to_string())));
        assert!(!filters.iter().any(|(k, _)| *k == "party"));
    }

    #[rstest]
    #[case("accounting", true)]
    #[case("selling-2", true)]
    #[case("", false)]
    #[case("Accounting", false)]
    #[case("../desk", false)]
    #[case("a b", false)]
    fn test_module_slug(#[case] module: &str, #[case] expected: bool) {
        assert_eq!(is_module_slug(module), expected);
    }

    #[tokio::test]
    async fn test_general_ledger_forwards_session() {
        let platform = platform_accepting_login().await;
        let app = create_router(test_state(&platform.uri()));

        let response = app
            .oneshot(get(
                "/api/v1/redirect/general-ledger?from_date=2026-01-01&to_date=2026-01-31&account=Cash",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with(&format!(
            "{}/app/query-report/General%20Ledger?",
            platform.uri()
        )));
        assert!(location.contains("company=Acme+Ltd"));
        assert!(location.contains("from_date=2026-01-01"));
        assert!(location.contains("account=Cash"));

        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("sid=abc123"));
        assert!(cookie.contains("Path=/"));
    }

    #[tokio::test]
    async fn test_module_redirect() {
        let platform = platform_accepting_login().await;
        let app = create_router(test_state(&platform.uri()));

        let response = app
            .oneshot(get("/api/v1/redirect/module/accounting"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            format!("{}/app/accounting", platform.uri())
        );
    }

    #[tokio::test]
    async fn test_rejected_login_is_bad_gateway() {
        let platform = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/method/login"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&platform)
            .await;
        let app = create_router(test_state(&platform.uri()));

        let response = app
            .oneshot(get("/api/v1/redirect/general-ledger"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["code"], "PLATFORM_LOGIN_FAILED");
    }

    #[tokio::test]
    async fn test_invalid_module_is_not_forwarded() {
        let platform = MockServer::start().await;
        let app = create_router(test_state(&platform.uri()));

        let response = app
            .oneshot(get("/api/v1/redirect/module/Desk"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["code"], "INVALID_MODULE");
        assert!(platform.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_date_is_invalid_query() {
        let platform = MockServer::start().await;
        let app = create_router(test_state(&platform.uri()));

        let response = app
            .oneshot(get("/api/v1/redirect/general-ledger?from_date=yesterday"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["code"], "INVALID_QUERY");
    }
}
