#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use quire_db::store::InMemoryStore;
use tower::ServiceExt;

use quire_api::auth::identity::{IdentityError, IdentityVerifier};
use quire_api::config::ServerConfig;
use quire_api::router::build_app_router;
use quire_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        identity_verifier_url: "http://verifier.invalid/verify".to_string(),
        identity_audience: "http://localhost:3000".to_string(),
        cookie_secure: false,
    }
}

/// Accepts assertions of the form `valid:<email>`. The assertion `down`
/// simulates an unreachable verifier; anything else is rejected.
pub struct StubVerifier;

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify(&self, assertion: &str) -> Result<String, IdentityError> {
        if let Some(email) = assertion.strip_prefix("valid:") {
            return Ok(email.to_string());
        }
        if assertion == "down" {
            return Err(IdentityError::UnexpectedResponse {
                status: 502,
                body: "bad gateway".into(),
            });
        }
        Err(IdentityError::Rejected("invalid assertion".into()))
    }
}

/// The application under test plus a handle on its store for seeding.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
}

/// Build the full application router over a fresh in-memory store, with
/// the same middleware stack production uses.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(InMemoryStore::new());

    let state = AppState {
        store: store.clone(),
        config: Arc::new(config.clone()),
        verifier: Arc::new(StubVerifier),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a request with an optional session cookie and JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::GET, uri, Some(cookie), None).await
}

pub async fn put_json_auth(
    app: &Router,
    uri: &str,
    cookie: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PUT, uri, Some(cookie), Some(body)).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    cookie: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, Some(cookie), Some(body)).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as text.
pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// The `name=value` part of the response's `Set-Cookie` header.
pub fn session_cookie(response: &Response) -> String {
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("response should set a cookie")
        .to_str()
        .unwrap();
    header.split(';').next().unwrap().to_string()
}

/// Log `email` in through the API and return the cookie to send back.
pub async fn login(app: &Router, email: &str) -> String {
    let response = post_json(
        app,
        "/_login",
        serde_json::json!({ "assertion": format!("valid:{email}") }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response)
}

/// Log in the first user (who becomes admin) and return their cookie.
pub async fn login_admin(app: &Router) -> String {
    login(app, "admin@example.com").await
}

/// Log in `email`, then have `admin_cookie` grant them `role`.
pub async fn login_with_role(app: &Router, admin_cookie: &str, email: &str, role: &str) -> String {
    let cookie = login(app, email).await;
    let response = post_json_auth(
        app,
        "/_admin/role",
        admin_cookie,
        serde_json::json!({ "email": email, "role": role }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    cookie
}
