use crate::error::{Result, ResultExt as _};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr as _;

/// Shared connection pool with the users/datasets schema in place.
#[derive(Clone, Debug)]
pub struct DbClient {
    pool: Pool<Sqlite>,
}

impl DbClient {
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .context("Invalid database URL")?
            .create_if_missing(true)
            .foreign_keys(true);

        let file = options.get_filename();
        if !file.as_os_str().is_empty()
            && file != std::path::Path::new(":memory:")
            && let Some(parent) = file.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(std::time::Duration::from_secs(10))
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database at {url}"))?;

        let client = Self { pool };
        client.init_schema().await?;
        tracing::info!("Connected to dataset store at {url}");
        Ok(client)
    }

    /// Private store that lives as long as the returned client. All handles
    /// must share one connection or each would see its own empty database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid in-memory database URL")?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        let client = Self { pool };
        client.init_schema().await?;
        Ok(client)
    }

    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create users table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS datasets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                data BLOB NOT NULL,
                format_version INTEGER NOT NULL,
                uploaded_by TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create datasets table")?;

        Ok(())
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}
