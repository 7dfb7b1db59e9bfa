use anyhow::Result;
use sea_orm::{DatabaseConnection, SqlxPostgresConnector};
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Create the sqlx pool shared by migrations and the ORM.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Apply the SQL files in `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Wrap an existing pool in a SeaORM connection.
pub fn create_orm_conn(pool: PgPool) -> DatabaseConnection {
    SqlxPostgresConnector::from_sqlx_postgres_pool(pool)
}
