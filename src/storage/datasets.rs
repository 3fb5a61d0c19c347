use super::codec;
use super::db::DbClient;
use crate::error::{ExplorerError, Result, ResultExt as _};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

pub type DatasetId = i64;

/// Everything about a dataset except its table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DatasetMeta {
    pub id: DatasetId,
    pub name: String,
    pub description: String,
    pub owner: String,
}

/// Uploaded datasets. Saves are serialized through one write lock and each
/// runs in its own transaction; reads go straight to the pool.
#[derive(Clone, Debug)]
pub struct DatasetRepository {
    db: DbClient,
    write_lock: Arc<Mutex<()>>,
}

impl DatasetRepository {
    pub fn new(db: DbClient) -> Self {
        Self {
            db,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn save(
        &self,
        name: &str,
        description: &str,
        df: &DataFrame,
        owner: &str,
    ) -> Result<DatasetId> {
        let data = codec::encode(df)?;

        let _guard = self.write_lock.lock().await;
        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .context("Failed to start dataset transaction")?;

        let id = sqlx::query(
            "INSERT INTO datasets (name, description, data, format_version, uploaded_by) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(description)
        .bind(&data)
        .bind(i64::from(codec::FORMAT_VERSION))
        .bind(owner)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to save dataset '{name}'"))?
        .last_insert_rowid();

        tx.commit()
            .await
            .context("Failed to commit dataset transaction")?;

        tracing::info!(
            "Saved dataset {id} '{name}' for {owner} ({} rows x {} columns, {} bytes)",
            df.height(),
            df.width(),
            data.len()
        );
        Ok(id)
    }

    /// All datasets in upload order. Table bytes are not read.
    pub async fn list(&self) -> Result<Vec<DatasetMeta>> {
        let rows = sqlx::query_as::<_, DatasetMeta>(
            "SELECT id, name, description, uploaded_by AS owner FROM datasets ORDER BY id",
        )
        .fetch_all(self.db.pool())
        .await
        .context("Failed to list datasets")?;
        Ok(rows)
    }

    pub async fn get_metadata(&self, id: DatasetId) -> Result<DatasetMeta> {
        sqlx::query_as::<_, DatasetMeta>(
            "SELECT id, name, description, uploaded_by AS owner FROM datasets WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await
        .with_context(|| format!("Failed to look up dataset {id}"))?
        .ok_or(ExplorerError::NotFound(id))
    }

    pub async fn get(&self, id: DatasetId) -> Result<DataFrame> {
        let row: Option<(Vec<u8>, i64)> =
            sqlx::query_as("SELECT data, format_version FROM datasets WHERE id = ?")
                .bind(id)
                .fetch_optional(self.db.pool())
                .await
                .with_context(|| format!("Failed to load dataset {id}"))?;

        let (data, version) = row.ok_or(ExplorerError::NotFound(id))?;
        if version != i64::from(codec::FORMAT_VERSION) {
            return Err(ExplorerError::CorruptEncoding(format!(
                "dataset {id} was stored with unsupported format version {version}"
            )));
        }

        let df = codec::decode(&data)?;
        tracing::debug!("Loaded dataset {id} ({} rows)", df.height());
        Ok(df)
    }
}
