use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod orders;
pub mod pages;
pub mod repository;
pub mod views;

// Routing segregated by access rule (public, JSON API, dashboard pages).
pub mod routes;
use auth::AuthUser;
use routes::{authenticated, dashboard, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use repository::{RepositoryState, StaticOrderRepository};
pub use views::Views;

/// ApiDoc
///
/// OpenAPI document for the JSON endpoints, served at `/api-docs/openapi.json` and browsable
/// through Swagger UI.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::get_orders, handlers::get_order, handlers::get_me),
    components(
        schemas(
            models::Order, models::OrderStatus, models::SortField, models::SortDirection,
            models::SessionProfile,
        )
    ),
    tags(
        (name = "pizza-dashboard", description = "Pizza order dashboard API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe container of everything a request may need. Cloned per request;
/// every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Order source (the static data set in production).
    pub repo: RepositoryState,
    /// Compiled page templates.
    pub views: Views,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for Views {
    fn from_ref(app_state: &AppState) -> Views {
        app_state.views.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Guards the JSON API. Extracting `AuthUser` rejects the request with 401 before the
/// handler runs when no valid session is present.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// page_session_middleware
///
/// Guards the dashboard pages. A browser without a valid session is sent to sign in.
async fn page_session_middleware(
    auth_user: Result<AuthUser, StatusCode>,
    request: Request,
    next: Next,
) -> Response {
    match auth_user {
        Ok(_) => next.run(request).await,
        Err(_) => Redirect::to("/auth/signin").into_response(),
    }
}

/// Origins accepted by the CORS layer. Entries without a scheme are taken as `http://`;
/// entries that are not valid header values are skipped.
pub fn cors_origins(config: &AppConfig) -> Vec<HeaderValue> {
    config
        .allowed_origins
        .iter()
        .map(|origin| {
            if origin.contains("://") {
                origin.clone()
            } else {
                format!("http://{origin}")
            }
        })
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

/// create_router
///
/// Assembles the routing structure, applies the gating and observability middleware, and
/// registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(AllowOrigin::list(cors_origins(&state.config)))
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .merge(
            dashboard::dashboard_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                page_session_middleware,
            )),
        )
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the per-request span, tagged with method, URI and the `x-request-id` so every log
/// line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
