use crate::{AppState, pages};
use axum::{Router, routing::get};

/// Dashboard Router Module
///
/// Server-rendered pages behind the session gate. Unlike the JSON API, a missing session
/// redirects the browser to /auth/signin instead of answering 401.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        // GET /dashboard
        // Greeting page.
        .route("/dashboard", get(pages::dashboard_home))
        // GET /dashboard/orders?sort=...&dir=...&status=...
        // The orders table.
        .route("/dashboard/orders", get(pages::orders_page))
}
