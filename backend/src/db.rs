//! SQLite connection pool and schema migrations

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;
use crate::error::AppResult;

/// Open the pool described by `config`, creating the database file if needed
pub async fn connect(config: &DatabaseConfig) -> AppResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Private in-memory database with the schema applied.
///
/// A single connection is kept alive for the lifetime of the pool, since
/// every new in-memory connection starts from an empty database.
pub async fn connect_in_memory() -> AppResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

/// Apply the embedded migrations
pub async fn migrate(pool: &SqlitePool) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
