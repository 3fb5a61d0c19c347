//! Username/password accounts.
//!
//! Passwords are hashed with Argon2id using a fresh random salt and stored in
//! PHC string form (`$argon2id$v=19$m=19456,t=2,p=1$...`). Neither passwords
//! nor hashes are ever logged.

use super::db::DbClient;
use crate::error::{ExplorerError, Result, ResultExt as _};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

#[derive(Clone, Debug)]
pub struct CredentialStore {
    db: DbClient,
}

impl CredentialStore {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }

    /// Creates an account. An existing username fails with
    /// [`ExplorerError::DuplicateUsername`] and leaves the store unchanged.
    pub async fn register(&self, username: &str, password: &str) -> Result<()> {
        let hash = hash_password(password)?;

        let inserted = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(&hash)
            .execute(self.db.pool())
            .await;

        match inserted {
            Ok(_) => {
                tracing::info!("Registered user '{username}'");
                Ok(())
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tracing::debug!("Rejected duplicate signup for '{username}'");
                Err(ExplorerError::DuplicateUsername(username.to_owned()))
            }
            Err(e) => Err(e).context("Failed to register user"),
        }
    }

    /// True only for a known username with the matching password. Unknown
    /// users and wrong passwords are indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(self.db.pool())
                .await
                .context("Failed to look up user")?;

        let Some(hash) = stored else {
            tracing::debug!("Login failed for '{username}'");
            return Ok(false);
        };

        let ok = verify_password(password, &hash)?;
        if ok {
            tracing::info!("User '{username}' logged in");
        } else {
            tracing::debug!("Login failed for '{username}'");
        }
        Ok(ok)
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ExplorerError::Other(format!("Failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ExplorerError::Other(format!("Invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
