use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::{StatusCode, Uri, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use serde::Deserialize;

use crate::{
    AppState,
    auth::{self, AuthUser, LOCAL_DEVELOPER_NAME, SessionError},
    config::{AppConfig, Env},
    error::AppError,
    handlers::table_query,
    models::TableQuery,
    orders,
    views::{self, Views},
};

/// AuthErrorCode
///
/// Codes carried to `/auth/error`. Anything the provider reports outside this set is
/// shown as `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    AccessDenied,
    Configuration,
    Verification,
    SessionRequired,
    Default,
}

impl AuthErrorCode {
    pub fn from_provider(code: &str) -> Self {
        match code {
            "AccessDenied" => Self::AccessDenied,
            "Configuration" => Self::Configuration,
            "Verification" => Self::Verification,
            "SessionRequired" => Self::SessionRequired,
            _ => Self::Default,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessDenied => "AccessDenied",
            Self::Configuration => "Configuration",
            Self::Verification => "Verification",
            Self::SessionRequired => "SessionRequired",
            Self::Default => "Default",
        }
    }

    /// Where the browser is sent to see this error.
    pub fn redirect(self) -> Redirect {
        Redirect::to(&format!("/auth/error?error={}", self.as_str()))
    }
}

/// The response that stores `token` as the session and moves on to the dashboard.
fn start_session(token: &str, config: &AppConfig) -> Response {
    (
        [(header::SET_COOKIE, auth::session_cookie(token, config))],
        Redirect::to("/dashboard"),
    )
        .into_response()
}

// --- Public Pages ---

/// root
///
/// Sends signed-in users to the dashboard and everyone else to sign in.
pub async fn root(user: Result<AuthUser, StatusCode>) -> Redirect {
    match user {
        Ok(_) => Redirect::to("/dashboard"),
        Err(_) => Redirect::to("/auth/signin"),
    }
}

/// signin_page
///
/// Links to the external identity provider, passing our callback URL along. Local builds
/// also offer the developer sign-in.
pub async fn signin_page(
    user: Result<AuthUser, StatusCode>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    if user.is_ok() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let config = &state.config;
    let separator = if config.auth_provider_url.contains('?') { "&" } else { "?" };

    let page = state.views.render(
        "signin.html",
        context! {
            provider_url => config.auth_provider_url.as_str(),
            separator => separator,
            callback_url => config.callback_url(),
            dev_signin => config.env == Env::Local,
        },
    )?;
    Ok(page.into_response())
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub token: Option<String>,
    pub error: Option<String>,
}

/// auth_callback
///
/// Landing point after the provider signs the user in. A valid token becomes the session
/// cookie. A provider error ends on the auth error page, as does a bad token
/// (`SessionRequired` when it has expired, `Verification` otherwise).
pub async fn auth_callback(
    State(config): State<AppConfig>,
    Query(params): Query<CallbackParams>,
) -> Response {
    if let Some(code) = params.error.as_deref() {
        tracing::info!(code, "identity provider reported a sign-in error");
        return AuthErrorCode::from_provider(code).redirect().into_response();
    }

    let Some(token) = params.token.filter(|token| !token.is_empty()) else {
        return AuthErrorCode::Verification.redirect().into_response();
    };

    match auth::decode_session(&token, &config) {
        Ok(claims) => {
            tracing::info!(sub = %claims.sub, "session established");
            start_session(&token, &config)
        }
        Err(SessionError::Expired) => {
            tracing::info!("callback token already expired");
            AuthErrorCode::SessionRequired.redirect().into_response()
        }
        Err(reason) => {
            tracing::warn!(%reason, "rejected session token from callback");
            AuthErrorCode::Verification.redirect().into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DevSigninParams {
    pub name: Option<String>,
}

/// dev_signin
///
/// LOCAL-ONLY: signs in without an identity provider by minting a session with the
/// configured secret. Behaves as a missing route in production.
pub async fn dev_signin(
    State(config): State<AppConfig>,
    Query(params): Query<DevSigninParams>,
) -> Response {
    if config.env != Env::Local {
        return StatusCode::NOT_FOUND.into_response();
    }

    let name = params
        .name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| LOCAL_DEVELOPER_NAME.to_string());

    match auth::issue_local_session(&name, &config) {
        Ok(token) => start_session(&token, &config),
        Err(e) => {
            tracing::error!(error = %e, "failed to mint developer session");
            AuthErrorCode::Configuration.redirect().into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ErrorParams {
    pub error: Option<String>,
}

/// auth_error_page
///
/// Shows the error code from the query string, or a generic message without one.
pub async fn auth_error_page(
    State(templates): State<Views>,
    Query(params): Query<ErrorParams>,
) -> Result<Html<String>, AppError> {
    let error = params.error.filter(|error| !error.is_empty());
    templates.render("auth_error.html", context! { error => error })
}

/// signout
///
/// Drops the session cookie and returns to the sign-in page.
pub async fn signout(State(config): State<AppConfig>) -> Response {
    (
        [(header::SET_COOKIE, auth::clear_session_cookie(&config))],
        Redirect::to("/auth/signin"),
    )
        .into_response()
}

/// legacy_orders
///
/// The pre-dashboard orders path. Permanently redirects, keeping the table query.
pub async fn legacy_orders(uri: Uri) -> Redirect {
    let target = match uri.query() {
        Some(query) => format!("/dashboard/orders?{query}"),
        None => "/dashboard/orders".to_string(),
    };
    Redirect::permanent(&target)
}

// --- Dashboard Pages (session required) ---

/// dashboard_home
///
/// Greets the signed-in user.
pub async fn dashboard_home(
    user: AuthUser,
    State(templates): State<Views>,
) -> Result<Html<String>, AppError> {
    templates.render(
        "home.html",
        context! {
            navigation => views::navigation("/dashboard"),
            user_name => user.display_name(),
        },
    )
}

/// orders_page
///
/// The sortable, filterable orders table. Column headers link to the toggled ordering.
pub async fn orders_page(
    user: AuthUser,
    State(state): State<AppState>,
    query: Result<Query<TableQuery>, QueryRejection>,
) -> Result<Html<String>, AppError> {
    let query = table_query(query)?;
    let all = state.repo.list_orders().await;
    let rows = orders::sort_and_filter(&all, &query);

    state.views.render(
        "orders.html",
        context! {
            navigation => views::navigation("/dashboard/orders"),
            user_name => user.display_name(),
            table => views::orders_table(&rows, query),
        },
    )
}
