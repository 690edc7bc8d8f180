use crate::{
    AppState,
    auth::AuthUser,
    error::AppError,
    models::{Order, SessionProfile, TableQuery},
    orders,
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};

/// Unwraps the table query, turning malformed `sort` / `dir` / `status` values into a 400.
pub fn table_query(query: Result<Query<TableQuery>, QueryRejection>) -> Result<TableQuery, AppError> {
    query
        .map(|Query(query)| query)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

// --- Handlers ---

/// get_orders
///
/// [Authenticated Route] Lists orders filtered by status and sorted by one column.
/// Defaults to newest first across all statuses.
#[utoipa::path(
    get,
    path = "/api/orders",
    params(TableQuery),
    responses(
        (status = 200, description = "Sorted and filtered orders", body = [Order]),
        (status = 400, description = "Unknown sort field, direction or status"),
        (status = 401, description = "No valid session")
    )
)]
pub async fn get_orders(
    _user: AuthUser,
    State(state): State<AppState>,
    query: Result<Query<TableQuery>, QueryRejection>,
) -> Result<Json<Vec<Order>>, AppError> {
    let query = table_query(query)?;
    let all = state.repo.list_orders().await;
    Ok(Json(orders::sort_and_filter(&all, &query)))
}

/// get_order
///
/// [Authenticated Route] Retrieves a single order by its id (e.g. `PZA003`).
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Found", body = Order),
        (status = 401, description = "No valid session"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_order(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    state
        .repo
        .get_order(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}

/// get_me
///
/// [Authenticated Route] The signed-in user as described by the identity provider.
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Profile", body = SessionProfile),
        (status = 401, description = "No valid session")
    )
)]
pub async fn get_me(user: AuthUser) -> Json<SessionProfile> {
    Json(SessionProfile::from(&user))
}
