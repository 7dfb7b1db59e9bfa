use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront::{
    catalog::Catalog,
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    repository::{InMemoryRepository, PostgresRepository, StorefrontRepository},
    routes::create_app,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,storefront=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let repo: Arc<dyn StorefrontRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = create_pool(database_url).await?;
            run_migrations(&pool).await?;
            tracing::info!("connected to database");
            Arc::new(PostgresRepository::new(create_orm_conn(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, orders will be kept in memory");
            Arc::new(InMemoryRepository::new())
        }
    };

    let state = AppState::new(repo, Arc::new(Catalog::seeded()));
    let app = create_app(state, &config.static_dir);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!("listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
