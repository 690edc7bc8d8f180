use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use pizza_dashboard::{
    AppState, StaticOrderRepository, Views,
    auth::{self, AuthUser, Claims, SessionError},
    config::{AppConfig, Env},
};
use std::{sync::Arc, time::SystemTime};

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
const TEST_SUBJECT: &str = "google-oauth2|1234";

fn now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn claims_for(sub: &str, name: Option<&str>) -> Claims {
    let now = now();
    Claims {
        sub: sub.to_string(),
        name: name.map(str::to_string),
        email: Some("pizza.fan@example.com".to_string()),
        picture: Some("https://lh3.googleusercontent.com/a/avatar".to_string()),
        iat: now as usize,
        exp: (now + 3600) as usize,
    }
}

fn sign(claims: &Claims, secret: &str) -> String {
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &key).unwrap()
}

fn create_token(name: &str) -> String {
    sign(&claims_for(TEST_SUBJECT, Some(name)), TEST_JWT_SECRET)
}

fn create_app_state(env: Env) -> AppState {
    let mut config = AppConfig::default();
    config.env = env;
    config.jwt_secret = TEST_JWT_SECRET.to_string();

    AppState {
        repo: Arc::new(StaticOrderRepository::new()),
        views: Views::new().unwrap(),
        config,
    }
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn with_header(mut parts: Parts, name: header::HeaderName, value: &str) -> Parts {
    parts
        .headers
        .insert(name, header::HeaderValue::from_str(value).unwrap());
    parts
}

// --- Tests ---

#[tokio::test]
async fn test_auth_success_with_bearer_token() {
    let app_state = create_app_state(Env::Production);
    let parts = get_request_parts(Method::GET, "/".parse().unwrap());
    let mut parts = with_header(
        parts,
        header::AUTHORIZATION,
        &format!("Bearer {}", create_token("Pizza Fan")),
    );

    let user = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .expect("valid bearer token is accepted");

    assert_eq!(user.id, TEST_SUBJECT);
    assert_eq!(user.name.as_deref(), Some("Pizza Fan"));
    assert_eq!(user.email.as_deref(), Some("pizza.fan@example.com"));
    assert_eq!(
        user.image.as_deref(),
        Some("https://lh3.googleusercontent.com/a/avatar")
    );
}

#[tokio::test]
async fn test_auth_success_with_session_cookie() {
    let app_state = create_app_state(Env::Production);
    let parts = get_request_parts(Method::GET, "/dashboard".parse().unwrap());
    let mut parts = with_header(
        parts,
        header::COOKIE,
        &format!("theme=dark; session={}; other=1", create_token("Cookie Eater")),
    );

    let user = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    assert_eq!(user.display_name(), "Cookie Eater");
}

#[tokio::test]
async fn test_auth_failure_with_missing_credentials() {
    let app_state = create_app_state(Env::Production);
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_expired_token() {
    let app_state = create_app_state(Env::Production);

    // Well past the validator's default leeway.
    let mut claims = claims_for(TEST_SUBJECT, Some("Late Diner"));
    claims.iat = (now() - 7200) as usize;
    claims.exp = (now() - 3600) as usize;
    let token = sign(&claims, TEST_JWT_SECRET);

    assert_eq!(
        auth::decode_session(&token, &app_state.config).unwrap_err(),
        SessionError::Expired
    );

    let parts = get_request_parts(Method::GET, "/".parse().unwrap());
    let mut parts = with_header(parts, header::AUTHORIZATION, &format!("Bearer {token}"));
    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_wrong_signature() {
    let app_state = create_app_state(Env::Production);
    let token = sign(&claims_for(TEST_SUBJECT, None), "some-other-secret");

    assert!(matches!(
        auth::decode_session(&token, &app_state.config),
        Err(SessionError::Invalid(_))
    ));

    let parts = get_request_parts(Method::GET, "/".parse().unwrap());
    let mut parts = with_header(parts, header::COOKIE, &format!("session={token}"));
    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_session_cookie_is_ignored() {
    let app_state = create_app_state(Env::Production);
    let parts = get_request_parts(Method::GET, "/".parse().unwrap());
    let parts = with_header(parts, header::COOKIE, "session=");

    assert_eq!(auth::extract_session_cookie(&parts), None);
    assert_eq!(
        auth::resolve_session(&parts, &app_state.config).unwrap_err(),
        SessionError::Missing
    );
}

#[tokio::test]
async fn test_local_bypass_success() {
    let app_state = create_app_state(Env::Local);

    let parts = get_request_parts(Method::GET, "/".parse().unwrap());
    let parts = with_header(parts, header::HeaderName::from_static("x-user-id"), "dev-1");
    let mut parts = with_header(
        parts,
        header::HeaderName::from_static("x-user-name"),
        "Margherita Tester",
    );

    let user = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    assert_eq!(user.id, "dev-1");
    assert_eq!(user.display_name(), "Margherita Tester");
}

#[tokio::test]
async fn test_local_bypass_defaults_name() {
    let app_state = create_app_state(Env::Local);
    let parts = get_request_parts(Method::GET, "/".parse().unwrap());
    let mut parts = with_header(parts, header::HeaderName::from_static("x-user-id"), "dev-2");

    let user = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    assert_eq!(user.display_name(), auth::LOCAL_DEVELOPER_NAME);
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let app_state = create_app_state(Env::Production);

    let parts = get_request_parts(Method::GET, "/".parse().unwrap());
    // Provide ONLY the local bypass header
    let mut parts = with_header(parts, header::HeaderName::from_static("x-user-id"), "dev-1");

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_issued_local_session_decodes() {
    let config = AppConfig::default();
    let token = auth::issue_local_session("Local Developer", &config).unwrap();

    let claims = auth::decode_session(&token, &config).unwrap();
    assert_eq!(claims.sub, "local:local-developer");
    assert_eq!(claims.name.as_deref(), Some("Local Developer"));
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_display_name_falls_back_to_email() {
    let user = AuthUser {
        id: "u1".to_string(),
        name: None,
        email: Some("no.name@example.com".to_string()),
        image: None,
    };
    assert_eq!(user.display_name(), "no.name@example.com");

    let anonymous = AuthUser { email: None, ..user };
    assert_eq!(anonymous.display_name(), "");
}

#[test]
fn test_session_cookie_attributes() {
    let mut config = AppConfig::default();
    config.session_ttl_secs = 600;

    let cookie = auth::session_cookie("abc.def.ghi", &config);
    assert_eq!(
        cookie,
        "session=abc.def.ghi; Path=/; HttpOnly; SameSite=Lax; Max-Age=600"
    );

    config.secure_cookies = true;
    assert!(auth::session_cookie("t", &config).ends_with("; Secure"));
    assert!(auth::clear_session_cookie(&config).contains("Max-Age=0"));
}
