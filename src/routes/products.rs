use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    error::{AppError, AppResult},
    models::Product,
    response::ApiResponse,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "The product catalog", body = ApiResponse<Vec<Product>>)
    ),
    tag = "Products"
)]
pub async fn list_products(State(state): State<AppState>) -> Json<ApiResponse<Vec<Product>>> {
    let products = state.catalog.products().to_vec();
    Json(ApiResponse::success("Products", products))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = i64, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "One product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found")
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state.catalog.find(id).cloned().ok_or(AppError::NotFound)?;
    Ok(Json(ApiResponse::success("Product", product)))
}
