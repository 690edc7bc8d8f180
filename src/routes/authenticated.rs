use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// JSON endpoints for a signed-in user. The router layer above this module runs the
/// `AuthUser` extractor first, so every handler here receives a validated identity.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/me
        // The session's user profile.
        .route("/api/me", get(handlers::get_me))
        // GET /api/orders?sort=...&dir=...&status=...
        // Sorted and filtered order listing.
        .route("/api/orders", get(handlers::get_orders))
        // GET /api/orders/{id}
        .route("/api/orders/{id}", get(handlers::get_order))
}
