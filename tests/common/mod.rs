#![allow(dead_code)]

use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use storefront::{
    catalog::Catalog, repository::InMemoryRepository, routes::create_app, state::AppState,
};

/// Serves `app` on an ephemeral local port and returns its address.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Starts the real service over an in-memory repository.
pub async fn spawn_service() -> (String, Arc<InMemoryRepository>) {
    let repo = Arc::new(InMemoryRepository::new());
    let state = AppState::new(repo.clone(), Arc::new(Catalog::seeded()));
    let addr = serve(create_app(state, Path::new("no-such-static-dir"))).await;
    (format!("http://{addr}/api"), repo)
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}
