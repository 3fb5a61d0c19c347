//! Entry point for front-ends: accounts, uploads and exploration wired over
//! one database.

use crate::analyser::controller::{self, Exploration, View};
use crate::analyser::logic::ClassifiedFrame;
use crate::config::AppConfig;
use crate::error::Result;
use crate::storage::{CredentialStore, DatasetId, DatasetMeta, DatasetRepository, DbClient};
use polars::prelude::DataFrame;

/// Proof of a successful signup or login. Only [`Explorer`] hands these out,
/// so holding one means the user was authenticated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    username: String,
}

impl Session {
    pub fn username(&self) -> &str {
        &self.username
    }
}

#[derive(Clone, Debug)]
pub struct Explorer {
    credentials: CredentialStore,
    datasets: DatasetRepository,
    config: AppConfig,
}

impl Explorer {
    pub async fn open(config: AppConfig) -> Result<Self> {
        let db = DbClient::connect(&config.database_url).await?;
        Ok(Self::with_client(db, config))
    }

    pub fn with_client(db: DbClient, config: AppConfig) -> Self {
        Self {
            credentials: CredentialStore::new(db.clone()),
            datasets: DatasetRepository::new(db),
            config,
        }
    }

    /// Registers the account and opens a session for it.
    pub async fn sign_up(&self, username: &str, password: &str) -> Result<Session> {
        self.credentials.register(username, password).await?;
        Ok(Session {
            username: username.to_owned(),
        })
    }

    /// `None` when the username is unknown or the password does not match.
    pub async fn log_in(&self, username: &str, password: &str) -> Result<Option<Session>> {
        let ok = self.credentials.authenticate(username, password).await?;
        Ok(ok.then(|| Session {
            username: username.to_owned(),
        }))
    }

    /// Stores `df` as a new dataset owned by the session's user.
    pub async fn upload(
        &self,
        session: &Session,
        name: &str,
        description: &str,
        df: &DataFrame,
    ) -> Result<DatasetId> {
        self.datasets
            .save(name, description, df, session.username())
            .await
    }

    pub async fn datasets(&self) -> Result<Vec<DatasetMeta>> {
        self.datasets.list().await
    }

    /// Loads a dataset, classifies it afresh and renders one view of it.
    pub async fn explore(
        &self,
        _session: &Session,
        id: DatasetId,
        view: &View,
    ) -> Result<Exploration> {
        let meta = self.datasets.get_metadata(id).await?;
        let frame = ClassifiedFrame::new(self.datasets.get(id).await?);
        tracing::debug!(
            "Exploring dataset {id} with {} numeric and {} categorical columns",
            frame.classification().numeric.len(),
            frame.classification().categorical.len()
        );
        controller::explore_frame(meta, &frame, view, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyser::controller::{Outcome, ViewResult};
    use crate::error::ExplorerError;
    use polars::prelude::*;

    async fn explorer() -> anyhow::Result<Explorer> {
        Ok(Explorer::with_client(
            DbClient::in_memory().await?,
            AppConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_log_in_requires_matching_password() -> anyhow::Result<()> {
        let explorer = explorer().await?;
        let session = explorer.sign_up("alice", "pw").await?;
        assert_eq!(session.username(), "alice");

        assert_eq!(explorer.log_in("alice", "pw").await?, Some(session));
        assert_eq!(explorer.log_in("alice", "nope").await?, None);
        assert_eq!(explorer.log_in("bob", "pw").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_is_owned_by_session_user() -> anyhow::Result<()> {
        let explorer = explorer().await?;
        let session = explorer.sign_up("alice", "pw").await?;
        let df = df!["x" => [1i64, 2, 3]]?;
        let id = explorer.upload(&session, "numbers", "", &df).await?;

        let listed = explorer.datasets().await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].owner, "alice");
        Ok(())
    }

    #[tokio::test]
    async fn test_explore_unknown_dataset() -> anyhow::Result<()> {
        let explorer = explorer().await?;
        let session = explorer.sign_up("alice", "pw").await?;
        let err = explorer.explore(&session, 9, &View::Quality).await.unwrap_err();
        assert!(matches!(err, ExplorerError::NotFound(9)));
        Ok(())
    }

    #[tokio::test]
    async fn test_single_numeric_column_reports_missing_correlation() -> anyhow::Result<()> {
        let explorer = explorer().await?;
        let session = explorer.sign_up("alice", "pw").await?;
        let df = df!["x" => [1.0f64, 2.0, 3.0], "label" => ["a", "b", "a"]]?;
        let id = explorer.upload(&session, "one", "", &df).await?;

        let exploration = explorer.explore(&session, id, &View::Info).await?;
        let ViewResult::Info(info) = exploration.result else {
            panic!("expected info view");
        };
        assert!(matches!(info.correlation, Outcome::Unavailable { .. }));
        assert_eq!(info.head.rows.len(), 3);
        Ok(())
    }
}
