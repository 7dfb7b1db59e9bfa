use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::auth::{LoginRequest, LoginResponse},
    error::AppResult,
    response::ErrorBody,
    services::auth_service::login_user,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; unknown emails are registered", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let resp = login_user(state.repo.as_ref(), payload).await?;
    Ok(Json(resp))
}
