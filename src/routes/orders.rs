use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};

use crate::{
    dto::orders::{CreateOrderRequest, OrderDocument},
    error::AppResult,
    response::{ErrorBody, SuccessFlag},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}", delete(delete_order))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "All orders, newest first", body = Vec<OrderDocument>),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tag = "Orders"
)]
pub async fn list_orders(State(state): State<AppState>) -> AppResult<Json<Vec<OrderDocument>>> {
    let orders = order_service::list_orders(state.repo.as_ref()).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Stored order", body = OrderDocument),
        (status = 400, description = "Invalid order", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<OrderDocument>> {
    let order = order_service::create_order(state.repo.as_ref(), payload).await?;
    Ok(Json(order))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(
        ("id" = i64, Path, description = "Order id")
    ),
    responses(
        (status = 200, description = "Deleted, or nothing to delete", body = SuccessFlag),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<SuccessFlag>> {
    let flag = order_service::delete_order(state.repo.as_ref(), id).await?;
    Ok(Json(flag))
}
