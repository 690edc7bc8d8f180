use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    config::{AppConfig, Env},
    models::SessionProfile,
};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Display name given to sessions created through the local bypass and developer sign-in.
pub const LOCAL_DEVELOPER_NAME: &str = "Local Developer";

/// Claims
///
/// Payload of the session token issued by the external identity provider and signed with
/// the shared secret. Only `sub` and the time claims are mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the provider's identifier for the user.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Expiration Time (exp): the token is refused after this instant.
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

/// SessionError
///
/// Why a session credential was refused. Gated routes collapse all of these into a 401 or a
/// sign-in redirect. The sign-in callback reports `Expired` as `SessionRequired` on the auth
/// error page and everything else as `Verification`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no session credential presented")]
    Missing,
    #[error("session token expired")]
    Expired,
    #[error("session token invalid: {0}")]
    Invalid(String),
}

/// AuthUser
///
/// The resolved identity of an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

impl AuthUser {
    /// Name used in greetings: the profile name, else the email, else nothing.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or_default()
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
            image: claims.picture,
        }
    }
}

impl From<&AuthUser> for SessionProfile {
    fn from(user: &AuthUser) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
        }
    }
}

/// decode_session
///
/// Validates a raw session token against the configured secret. Expiration is always
/// checked.
pub fn decode_session(token: &str, config: &AppConfig) -> Result<Claims, SessionError> {
    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::default();
    validation.validate_exp = true;

    match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) => match e.kind() {
            ErrorKind::ExpiredSignature => Err(SessionError::Expired),
            _ => Err(SessionError::Invalid(e.to_string())),
        },
    }
}

/// issue_local_session
///
/// Mints a session token signed with the configured secret. Only the developer sign-in
/// route calls this; production sessions always come from the identity provider.
pub fn issue_local_session(
    name: &str,
    config: &AppConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();

    let claims = Claims {
        sub: format!("local:{}", name.to_lowercase().replace(' ', "-")),
        name: Some(name.to_string()),
        email: None,
        picture: None,
        iat: now as usize,
        exp: (now + config.session_ttl_secs) as usize,
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// `Set-Cookie` value storing `token` as the session.
pub fn session_cookie(token: &str, config: &AppConfig) -> String {
    let secure_flag = if config.secure_cookies { "; Secure" } else { "" };
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{secure_flag}",
        config.session_ttl_secs
    )
}

/// `Set-Cookie` value that removes the session.
pub fn clear_session_cookie(config: &AppConfig) -> String {
    let secure_flag = if config.secure_cookies { "; Secure" } else { "" };
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0{secure_flag}")
}

/// Reads the session token from the `Cookie` header, ignoring empty values.
pub fn extract_session_cookie(parts: &Parts) -> Option<String> {
    let cookies = parts
        .headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())?;

    cookies.split(';').find_map(|cookie| {
        cookie
            .trim()
            .strip_prefix("session=")
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}

/// Reads a `Bearer` token from the `Authorization` header.
fn extract_bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Local-only identity taken from the `x-user-id` / `x-user-name` headers.
fn local_bypass_user(parts: &Parts) -> Option<AuthUser> {
    let id = parts
        .headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())?;

    let name = parts
        .headers
        .get("x-user-name")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| LOCAL_DEVELOPER_NAME.to_string());

    Some(AuthUser {
        id: id.to_string(),
        name: Some(name),
        email: None,
        image: None,
    })
}

/// resolve_session
///
/// Resolves the caller's identity from request headers: the local bypass first (only in
/// `Env::Local`), then a Bearer token, then the session cookie.
pub fn resolve_session(parts: &Parts, config: &AppConfig) -> Result<AuthUser, SessionError> {
    if config.env == Env::Local
        && let Some(user) = local_bypass_user(parts)
    {
        return Ok(user);
    }

    let token = extract_bearer_token(parts)
        .or_else(|| extract_session_cookie(parts))
        .ok_or(SessionError::Missing)?;

    decode_session(&token, config).map(AuthUser::from)
}

/// AuthUser Extractor Implementation
///
/// Makes `AuthUser` usable as a handler argument. Authentication stays in the extractor
/// and the handlers only see a resolved identity.
///
/// Rejection: `StatusCode::UNAUTHORIZED` on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        resolve_session(parts, &config).map_err(|reason| {
            tracing::debug!(%reason, "session rejected");
            StatusCode::UNAUTHORIZED
        })
    }
}
