use crate::{AppState, pages};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a session: the entry redirect and the sign-in flow. The
/// session itself is issued by the external identity provider; these routes only consume
/// or clear it.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Load balancer and monitoring probe.
        .route("/health", get(|| async { "ok" }))
        // GET /
        // Redirects to /dashboard or /auth/signin depending on the session.
        .route("/", get(pages::root))
        // GET /auth/signin
        // Link to the identity provider (plus developer sign-in when local).
        .route("/auth/signin", get(pages::signin_page))
        // GET /auth/callback?token=...&error=...
        // Provider return path. Stores the session cookie or redirects to /auth/error.
        .route("/auth/callback", get(pages::auth_callback))
        // GET /auth/dev-signin
        // LOCAL-ONLY developer session. 404 in production.
        .route("/auth/dev-signin", get(pages::dev_signin))
        // GET /auth/error?error=...
        .route("/auth/error", get(pages::auth_error_page))
        // POST /api/auth/signout
        // Clears the session cookie. Posted by the dashboard's Sign Out form.
        .route("/api/auth/signout", post(pages::signout))
        // GET /orders
        // Legacy path, permanently redirected to /dashboard/orders.
        .route("/orders", get(pages::legacy_orders))
}
