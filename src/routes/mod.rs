use std::{path::Path, time::Duration};

use axum::{
    Json, Router,
    handler::HandlerWithoutStateExt,
    http::{HeaderName, Request, Response, StatusCode, Uri},
    routing::get,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::{response::ErrorBody, state::AppState};

pub mod auth;
pub mod doc;
pub mod health;
pub mod orders;
pub mod products;

const REQUEST_ID_HEADER: &str = "x-request-id";

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(orders::router())
        .merge(products::router())
}

/// The whole HTTP surface: REST routes under `/api`, docs, and static assets
/// from `static_dir` for everything else.
pub fn create_app(state: AppState, static_dir: &Path) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id(request)
            )
        })
        .on_request(|request: &Request<_>, _span: &tracing::Span| {
            tracing::info!(
                request_id = %request_id(request),
                method = %request.method(),
                uri = %request.uri(),
                "request started"
            );
        })
        .on_response(|response: &Response<_>, latency: Duration, _span: &tracing::Span| {
            tracing::info!(
                status = %response.status(),
                ms = %latency.as_millis(),
                "request finished"
            );
        });

    let assets = ServeDir::new(static_dir).not_found_service(not_found.into_service());

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .fallback_service(assets)
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(1024 * 1024))
        .layer(ConcurrencyLimitLayer::new(100))
        .with_state(state)
}

fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ErrorBody>) {
    let body = ErrorBody::new(format!("Not Found: {}", uri.path()));
    (StatusCode::NOT_FOUND, Json(body))
}
