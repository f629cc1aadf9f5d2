//! In-process router tests for the authentication and authorization paths.
//!
//! These requests are all refused or answered before any query runs, so the
//! pool is created lazily and never connects.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use ems_server::{
    api,
    config::AppConfig,
    models::user::{Role, UserClaims},
    repository::Repository,
    services::Services,
    AppState,
};

fn app() -> Router {
    let config = AppConfig::default();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("lazy pool");
    let services = Services::new(Repository::new(pool), config.auth.clone());
    api::router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

fn token(role: Role, exp_offset: i64) -> String {
    let now = Utc::now().timestamp();
    UserClaims {
        sub: "tester@example.com".into(),
        user_id: 42,
        name: "Tester".into(),
        role,
        exp: now + exp_offset,
        iat: now - 120,
    }
    .create_token(&AppConfig::default().auth.jwt_secret)
    .expect("token")
}

fn request(method: Method, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

async fn send(req: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(req).await.expect("response");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_does_not_require_auth() {
    let (status, body) = send(request(Method::GET, "/api/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (status, body) = send(request(Method::GET, "/api/equipment", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NotAuthenticated");
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let expired = token(Role::Admin, -60);
    let (status, body) = send(request(Method::GET, "/api/equipment", Some(&expired), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_unauthorized() {
    let now = Utc::now().timestamp();
    let forged = UserClaims {
        sub: "mallory@example.com".into(),
        user_id: 1,
        name: "Mallory".into(),
        role: Role::Admin,
        exp: now + 3600,
        iat: now,
    }
    .create_token("not-the-server-secret")
    .expect("token");
    let (status, _) = send(request(Method::GET, "/api/users", Some(&forged), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_engineer_cannot_write_equipment() {
    let engineer = token(Role::Engineer, 3600);

    let (status, body) = send(request(
        Method::POST,
        "/api/equipment",
        Some(&engineer),
        Some(json!({ "name": "Oscilloscope" })),
    ))
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");

    let (status, _) = send(request(
        Method::PUT,
        "/api/equipment/1",
        Some(&engineer),
        Some(json!({ "location": "Lab 2" })),
    ))
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(request(Method::DELETE, "/api/equipment/1", Some(&engineer), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_manager_cannot_delete_equipment() {
    let manager = token(Role::Manager, 3600);
    let (status, _) = send(request(Method::DELETE, "/api/equipment/1", Some(&manager), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_engineer_cannot_decide_requests() {
    let engineer = token(Role::Engineer, 3600);
    let (status, _) = send(request(
        Method::PATCH,
        "/api/requests/5",
        Some(&engineer),
        Some(json!({ "status": "Approved" })),
    ))
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_decision_must_be_terminal() {
    let manager = token(Role::Manager, 3600);
    let (status, body) = send(request(
        Method::PATCH,
        "/api/requests/5",
        Some(&manager),
        Some(json!({ "status": "Pending" })),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_unknown_decision_status_is_bad_request() {
    let manager = token(Role::Manager, 3600);
    let (status, _) = send(request(
        Method::PATCH,
        "/api/requests/5",
        Some(&manager),
        Some(json!({ "status": "Done" })),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_role_is_checked_before_body_is_parsed() {
    let engineer = token(Role::Engineer, 3600);
    let (status, body) = send(request(
        Method::PATCH,
        "/api/requests/5",
        Some(&engineer),
        Some(json!({ "status": "Done" })),
    ))
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");

    let req = Request::builder()
        .method(Method::PATCH)
        .uri("/api/requests/5")
        .header(header::AUTHORIZATION, format!("Bearer {}", engineer))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let (status, _) = send(req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_role_is_checked_before_id_is_parsed() {
    let engineer = token(Role::Engineer, 3600);
    let (status, body) = send(request(Method::DELETE, "/api/equipment/abc", Some(&engineer), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");

    let (status, _) = send(request(
        Method::PATCH,
        "/api/requests/abc",
        Some(&engineer),
        Some(json!({ "status": "Approved" })),
    ))
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_malformed_id_uses_error_body() {
    let admin = token(Role::Admin, 3600);
    for (method, uri) in [
        (Method::GET, "/api/equipment/abc"),
        (Method::DELETE, "/api/users/1.5"),
        (Method::GET, "/api/equipment/abc/maintenance"),
    ] {
        let (status, body) = send(request(method, uri, Some(&admin), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], "BadValue", "{}", uri);
        assert_eq!(body["code"], 6, "{}", uri);
    }
}

#[tokio::test]
async fn test_only_admin_manages_users() {
    for role in [Role::Engineer, Role::Manager] {
        let bearer = token(role, 3600);
        let (status, _) = send(request(Method::GET, "/api/users", Some(&bearer), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{:?}", role);
    }
}

#[tokio::test]
async fn test_report_filter_rejects_inverted_range() {
    let engineer = token(Role::Engineer, 3600);
    let (status, body) = send(request(
        Method::GET,
        "/api/reports/filter?startDate=2024-02-01&endDate=2024-01-01",
        Some(&engineer),
        None,
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "startDate is after endDate");
}

#[tokio::test]
async fn test_token_accepted_from_cookie() {
    let engineer = token(Role::Engineer, 3600);
    let req = Request::builder()
        .method(Method::GET)
        .uri("/api/users")
        .header(header::COOKIE, format!("theme=dark; token={}", engineer))
        .body(Body::empty())
        .expect("request");
    // Authenticated through the cookie, then refused by role
    let (status, _) = send(req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bad_cookie_token_is_unauthorized() {
    let req = Request::builder()
        .method(Method::GET)
        .uri("/api/equipment")
        .header(header::COOKIE, "token=garbage")
        .body(Body::empty())
        .expect("request");
    let (status, _) = send(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let response = app()
        .oneshot(request(Method::POST, "/api/auth/logout", None, None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (status, body) = send(request(Method::GET, "/api-docs/openapi.json", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/equipment"].is_object());
}
