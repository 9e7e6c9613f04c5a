use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::debug;

use crate::error::CoreError;

pub use sqlx::SqlitePool as DbPool;

/// Opens (creating if needed) the SQLite database at `db_path` with foreign
/// keys enforced, and brings its schema up to date.
pub async fn establish_connection(db_path: &str) -> Result<SqlitePool, CoreError> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    if !Path::new(db_path).exists() {
        tokio::fs::File::create(db_path).await?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    debug!(db_path, "running migrations");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
