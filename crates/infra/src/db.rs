//! Database wiring: connection pool and embedded schema migrations.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use crate::store::StoreError;
use crate::store::postgres::map_sqlx_error;

/// Schema migrations under `crates/infra/migrations`, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open a Postgres pool.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))
}

/// Apply any pending migrations. Idempotent.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StoreError> {
    MIGRATOR.run(pool).await.map_err(|e| StoreError::Database {
        operation: "migrate",
        message: e.to_string(),
    })?;
    tracing::info!("database migrations applied");
    Ok(())
}
