use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

pub mod category;
pub mod chat;
pub mod event;
pub mod event_user;
pub mod session;
pub mod user;

pub static MIGRATOR: Migrator = sqlx::migrate!();

pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// Test pool: a migrated private database that lives as long as the pool.
/// Each in-memory connection is its own database, so the pool holds exactly
/// one and every query runs serially. The integration tests under `tests/`
/// build their apps on it; the server never calls it.
#[doc(hidden)]
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

/// A migrated database file in the temp dir, removed on drop. Unlike the
/// in-memory pool it can hold several connections, so writers really race.
#[cfg(test)]
pub(crate) struct TempDatabase(std::path::PathBuf);

#[cfg(test)]
impl Drop for TempDatabase {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.0.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
pub(crate) async fn connect_temp_file(
    max_connections: u32,
) -> Result<(SqlitePool, TempDatabase), sqlx::Error> {
    let path = std::env::temp_dir().join(format!("event-server-{}.db", uuid::Uuid::new_v4()));
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    Ok((pool, TempDatabase(path)))
}
