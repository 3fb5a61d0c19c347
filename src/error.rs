//! Centralized error handling for datavista.
//!
//! Every fallible library operation returns [`Result<T>`], whose error type is
//! [`ExplorerError`]. The variants fall into two groups:
//!
//! - **Recoverable**: the caller showed bad input or picked a dataset/column
//!   that cannot serve the request. A front-end shows the message and lets the
//!   user try again ([`ExplorerError::is_recoverable`] returns `true`).
//! - **Fatal**: storage or I/O failures. The current operation is abandoned and
//!   the error is propagated unchanged. Nothing is retried.
//!
//! ```
//! use datavista::error::ExplorerError;
//!
//! fn message_for(err: &ExplorerError) -> String {
//!     match err {
//!         ExplorerError::DuplicateUsername(name) => format!("{name} is taken"),
//!         ExplorerError::InsufficientColumns { .. } => err.to_string(),
//!         _ => "Something went wrong".to_owned(),
//!     }
//! }
//! ```
//!
//! The [`ResultExt`] trait adds `.context()` to any result whose error converts
//! into [`ExplorerError`]:
//!
//! ```no_run
//! use datavista::error::ResultExt as _;
//!
//! fn read_settings() -> datavista::error::Result<String> {
//!     std::fs::read_to_string("config.json").context("Failed to read settings")
//! }
//! ```

use std::fmt;

/// Main error type for datavista operations.
#[derive(Debug)]
pub enum ExplorerError {
    /// Signup attempted with a username that is already registered
    DuplicateUsername(String),

    /// No dataset has the requested identifier
    NotFound(i64),

    /// Bytes that were not produced by the table codec, or were truncated
    CorruptEncoding(String),

    /// The table lacks the column classes an analysis or chart needs
    InsufficientColumns {
        operation: &'static str,
        requirement: &'static str,
    },

    /// A selected column does not exist in the table
    UnknownColumn(String),

    /// A selected column exists but belongs to the wrong class
    ColumnKindMismatch {
        column: String,
        expected: &'static str,
    },

    /// Database operation errors
    Database(String),

    /// Polars failures while loading, encoding or summarizing tables
    DataProcessing(String),

    /// I/O errors
    Io(std::io::Error),

    /// Configuration errors
    Config(String),

    /// Generic error with context
    Other(String),
}

impl ExplorerError {
    /// Whether the calling boundary should report this error to the user and
    /// carry on, as opposed to treating it as a failed operation.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DuplicateUsername(_)
                | Self::NotFound(_)
                | Self::CorruptEncoding(_)
                | Self::InsufficientColumns { .. }
                | Self::UnknownColumn(_)
                | Self::ColumnKindMismatch { .. }
        )
    }
}

impl fmt::Display for ExplorerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateUsername(name) => {
                write!(f, "Username '{name}' already exists. Please choose a different username")
            }
            Self::NotFound(id) => write!(f, "Dataset {id} not found"),
            Self::CorruptEncoding(msg) => write!(f, "Corrupt table encoding: {msg}"),
            Self::InsufficientColumns {
                operation,
                requirement,
            } => write!(f, "Not enough columns for {operation}: requires {requirement}"),
            Self::UnknownColumn(name) => write!(f, "Column '{name}' not found"),
            Self::ColumnKindMismatch { column, expected } => {
                write!(f, "Column '{column}' is not {expected}")
            }
            Self::Database(msg) => write!(f, "Database error: {msg}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ExplorerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExplorerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for ExplorerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for ExplorerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for ExplorerError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<sqlx::Error> for ExplorerError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

// Front-ends that shuttle errors as plain strings
impl From<ExplorerError> for String {
    fn from(err: ExplorerError) -> Self {
        err.to_string()
    }
}

/// Result type alias for datavista operations.
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ExplorerError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap(msg.into(), e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(f(), e.into()))
    }
}

// Recoverable variants keep their identity so callers can still match on them;
// everything else collapses into a contextualised message.
fn wrap(msg: String, err: ExplorerError) -> ExplorerError {
    match err {
        ExplorerError::Database(inner) => ExplorerError::Database(format!("{msg}: {inner}")),
        ExplorerError::DataProcessing(inner) => {
            ExplorerError::DataProcessing(format!("{msg}: {inner}"))
        }
        ExplorerError::Config(inner) => ExplorerError::Config(format!("{msg}: {inner}")),
        other if other.is_recoverable() => other,
        other => ExplorerError::Other(format!("{msg}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExplorerError::InsufficientColumns {
            operation: "a heatmap",
            requirement: "at least two numeric columns",
        };
        assert_eq!(
            err.to_string(),
            "Not enough columns for a heatmap: requires at least two numeric columns"
        );
    }

    #[test]
    fn test_error_conversion_to_string() {
        let err = ExplorerError::NotFound(7);
        let s: String = err.into();
        assert_eq!(s, "Dataset 7 not found");
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(ExplorerError::DuplicateUsername("bob".to_owned()).is_recoverable());
        assert!(ExplorerError::CorruptEncoding("short".to_owned()).is_recoverable());
        assert!(!ExplorerError::Database("disk I/O error".to_owned()).is_recoverable());
    }

    #[test]
    fn test_result_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file.txt",
        ));

        let result: Result<()> = result.context("Failed to read file");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read file")
        );
    }

    #[test]
    fn test_context_keeps_recoverable_variant() {
        let result: Result<()> = Err(ExplorerError::NotFound(3));
        let result = result.context("Loading dataset");
        assert!(matches!(result, Err(ExplorerError::NotFound(3))));
    }

    #[test]
    fn test_context_keeps_database_variant() {
        let result: Result<()> = Err(ExplorerError::Database("locked".to_owned()));
        let err = result.context("Saving dataset").unwrap_err();
        assert!(matches!(err, ExplorerError::Database(ref m) if m == "Saving dataset: locked"));
    }
}
