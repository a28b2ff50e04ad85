//! HTTP-level integration tests for login, logout and session resolution.

mod common;

use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use common::{body_json, build_test_app, get, get_auth, login, post_json, session_cookie};
use serde_json::json;

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn first_login_becomes_admin_and_later_ones_pending() {
    let app = build_test_app();

    let response = post_json(
        &app.router,
        "/_login",
        json!({ "assertion": "valid:ann@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie_header = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie_header.starts_with("auth=ann@example.com|"));
    assert!(cookie_header.contains("HttpOnly"));
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "ann@example.com");
    assert_eq!(json["data"]["role"], "Admin");
    assert_eq!(json["data"]["admin"], true);

    let response = post_json(
        &app.router,
        "/_login",
        json!({ "assertion": "valid:bob@example.com" }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "Pending");
    assert_eq!(json["data"]["read"], false);
}

#[tokio::test]
async fn rejected_assertion_is_unauthorized() {
    let app = build_test_app();
    let response = post_json(&app.router, "/_login", json!({ "assertion": "forged" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn email_unfit_for_a_cookie_is_refused_before_any_write() {
    let app = build_test_app();
    let response = post_json(
        &app.router,
        "/_login",
        json!({ "assertion": "valid:\"ann;admin=1\"@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn empty_assertion_is_a_bad_request() {
    let app = build_test_app();
    let response = post_json(&app.router, "/_login", json!({ "assertion": "  " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unreachable_verifier_is_an_internal_error() {
    let app = build_test_app();
    let response = post_json(&app.router, "/_login", json!({ "assertion": "down" })).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Session resolution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn anonymous_session_has_no_capabilities() {
    let app = build_test_app();
    let json = body_json(get(&app.router, "/_session").await).await;
    assert_eq!(
        json["data"],
        json!({ "email": null, "role": null, "read": false, "write": false, "admin": false })
    );
}

#[tokio::test]
async fn cookie_restores_the_session() {
    let app = build_test_app();
    let cookie = login(&app.router, "ann@example.com").await;

    let json = body_json(get_auth(&app.router, "/_session", &cookie).await).await;
    assert_eq!(json["data"]["email"], "ann@example.com");
    assert_eq!(json["data"]["write"], true);
}

#[tokio::test]
async fn forged_check_value_is_anonymous() {
    let app = build_test_app();
    let genuine = login(&app.router, "ann@example.com").await;
    login(&app.router, "bob@example.com").await;

    // Reuse ann's check value with bob's email.
    let check = genuine.rsplit_once('|').unwrap().1;
    let forged = format!("auth=bob@example.com|{check}");
    let json = body_json(get_auth(&app.router, "/_session", &forged).await).await;
    assert_eq!(json["data"]["email"], serde_json::Value::Null);

    let garbage = get_auth(&app.router, "/_session", "auth=not-a-session").await;
    assert_eq!(garbage.status(), StatusCode::OK);
    assert_eq!(body_json(garbage).await["data"]["read"], false);

    let bad_hex = get_auth(&app.router, "/_session", "auth=ann@example.com|zz").await;
    assert_eq!(body_json(bad_hex).await["data"]["email"], serde_json::Value::Null);
}

#[tokio::test]
async fn email_case_does_not_matter_for_roles() {
    let app = build_test_app();
    let cookie = login(&app.router, "Ann@Example.com").await;
    let json = body_json(get_auth(&app.router, "/_session", &cookie).await).await;
    assert_eq!(json["data"]["role"], "Admin");
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn logout_clears_the_cookie() {
    let app = build_test_app();
    let response = post_json(&app.router, "/_logout", json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let header = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(header.contains("Max-Age=0"));
    assert_eq!(session_cookie(&response), "auth=");
}
