//! End-to-end tests of the perimeter in front of the real router
#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use auth_identity::IdentityConfig;
use medrecords_server::{create_app, AppState, ServerConfig};

const SECRET: &str = "perimeter-test-secret-0123456789abcdef";

fn config() -> ServerConfig {
    ServerConfig {
        identity: IdentityConfig::with_secret(SECRET),
        ..ServerConfig::default()
    }
}

fn app_with(config: &ServerConfig) -> Router {
    create_app(AppState::from_config(config).unwrap())
}

fn app() -> Router {
    app_with(&config())
}

fn token(claims: &Value) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn doctor_token() -> String {
    let now = Utc::now();
    token(&json!({
        "sub": "user-42",
        "role": "Médico",
        "profile": {"doctorId": "d-1"},
        "iat": now.timestamp(),
        "exp": (now + Duration::minutes(30)).timestamp()
    }))
}

fn patient_token() -> String {
    let now = Utc::now();
    token(&json!({
        "sub": "user-7",
        "roles": ["ROLE_PACIENTE"],
        "iat": now.timestamp(),
        "exp": (now + Duration::minutes(30)).timestamp()
    }))
}

fn request(method: Method, uri: &str, cookie: Option<&str>, csrf_header: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    if let Some(csrf) = csrf_header {
        builder = builder.header("X-CSRF-Token", csrf);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_protected_page_without_session_redirects_to_login() {
    let response = app()
        .oneshot(request(Method::GET, "/patients", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn test_login_without_cookie_passes_untouched() {
    let response = app()
        .oneshot(request(Method::GET, "/login", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(response.headers()[header::REFERRER_POLICY], "same-origin");
}

#[tokio::test]
async fn test_public_route_ignores_invalid_cookie() {
    let response = app()
        .oneshot(request(Method::GET, "/login", Some("access_token=not-a-token"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_with_valid_session_redirects_to_patients() {
    let cookie = format!("access_token={}", doctor_token());
    let response = app()
        .oneshot(request(Method::GET, "/login", Some(&cookie), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/patients");
}

#[tokio::test]
async fn test_protected_page_with_valid_session() {
    let cookie = format!("access_token={}", doctor_token());
    let response = app()
        .oneshot(request(Method::GET, "/patients", Some(&cookie), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&body).contains(r#"data-role="DOCTOR""#));
}

#[tokio::test]
async fn test_delete_with_mismatched_csrf_is_rejected() {
    let cookie = format!("access_token={}; csrf_token=cookie-token", doctor_token());
    let response = app()
        .oneshot(request(Method::DELETE, "/patients", Some(&cookie), Some("header-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error_type"], "csrf_mismatch");
    assert_eq!(body["code"], "CSRF_2101");
}

#[tokio::test]
async fn test_delete_without_csrf_header_is_rejected() {
    let cookie = format!("access_token={}; csrf_token=cookie-token", doctor_token());
    let response = app()
        .oneshot(request(Method::DELETE, "/api/patients/p-1", Some(&cookie), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_with_matching_csrf_reaches_handler() {
    let cookie = format!("access_token={}; csrf_token=shared-token", doctor_token());
    let response = app()
        .oneshot(request(Method::DELETE, "/api/patients/p-1", Some(&cookie), Some("shared-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_patient_role_cannot_delete_records() {
    let cookie = format!("access_token={}; csrf_token=shared-token", patient_token());
    let response = app()
        .oneshot(request(Method::DELETE, "/api/patients/p-1", Some(&cookie), Some("shared-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_session_endpoint_returns_normalized_context() {
    let cookie = format!("access_token={}", doctor_token());
    let response = app()
        .oneshot(request(Method::GET, "/api/auth/session", Some(&cookie), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["subjectId"], "user-42");
    assert_eq!(body["role"], "DOCTOR");
    assert_eq!(body["doctorId"], "d-1");
}

#[tokio::test]
async fn test_api_without_session_gets_401() {
    let response = app()
        .oneshot(request(Method::GET, "/api/patients", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error_type"], "unauthenticated");
    assert_eq!(body["code"], "AUTH_2001");
}

#[tokio::test]
async fn test_expired_session_is_unauthenticated() {
    let now = Utc::now();
    let expired = token(&json!({
        "sub": "user-42",
        "role": "DOCTOR",
        "exp": (now - Duration::minutes(5)).timestamp()
    }));
    let cookie = format!("access_token={expired}");

    let response = app()
        .oneshot(request(Method::GET, "/api/auth/session", Some(&cookie), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error_type"], "unauthenticated");
    assert_eq!(body["code"], "AUTH_2002");
}

#[tokio::test]
async fn test_tampered_session_is_invalid_signature() {
    let forged = encode(
        &Header::default(),
        &json!({"sub": "user-42", "role": "ADMIN", "exp": (Utc::now() + Duration::minutes(5)).timestamp()}),
        &EncodingKey::from_secret(b"attacker-controlled-secret-0123456789"),
    )
    .unwrap();
    let cookie = format!("access_token={forged}");

    let response = app()
        .oneshot(request(Method::GET, "/api/auth/session", Some(&cookie), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error_type"], "invalid_signature");
}

#[tokio::test]
async fn test_browser_with_invalid_session_is_redirected() {
    let response = app()
        .oneshot(request(Method::GET, "/patients", Some("access_token=garbage"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn test_unknown_and_ambiguous_paths_are_protected() {
    for path in ["/unknown", "/static/../patients", "/login%2F..%2Fpatients", "/loginx"] {
        let response = app()
            .oneshot(request(Method::GET, path, None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
    }
}

#[tokio::test]
async fn test_csrf_endpoint_issues_readable_cookie() {
    let response = app()
        .oneshot(request(Method::GET, "/api/auth/csrf", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(set_cookie.starts_with("csrf_token="));
    assert!(set_cookie.contains("SameSite=Strict"));
    assert!(set_cookie.contains("Secure"));
    assert!(!set_cookie.contains("HttpOnly"));

    let body = json_body(response).await;
    let token = body["csrfToken"].as_str().unwrap();
    assert!(set_cookie.contains(token));
    assert_eq!(body["headerName"], "X-CSRF-Token");
}

#[tokio::test]
async fn test_csrf_endpoint_reuses_existing_token() {
    let response = app()
        .oneshot(request(Method::GET, "/api/auth/csrf", Some("csrf_token=existing"), None))
        .await
        .unwrap();

    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = json_body(response).await;
    assert_eq!(body["csrfToken"], "existing");
}

#[tokio::test]
async fn test_public_health_check() {
    let response = app()
        .oneshot(request(Method::GET, "/api/public/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_preview_requires_flag() {
    let response = app()
        .oneshot(request(Method::GET, "/preview", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let mut config = config();
    config.gateway.preview_enabled = true;
    let response = app_with(&config)
        .oneshot(request(Method::GET, "/preview", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
