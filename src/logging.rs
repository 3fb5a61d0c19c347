//! Logging setup for datavista binaries.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job. [`init`] writes to the console and to daily-rotating files in
//! the platform data directory:
//!
//! - `datavista.<date>.log`: every enabled level
//! - `error.<date>.log`: warnings and errors only
//!
//! ```no_run
//! datavista::logging::init().expect("Failed to initialize logging");
//! tracing::info!("Explorer started");
//! ```

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing::Subscriber;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt as _,
    registry::LookupSpan, util::SubscriberInitExt as _,
};

const KEPT_LOG_FILES: usize = 10;

/// Gets the log directory, creating it if needed.
pub fn get_log_dir() -> Result<PathBuf> {
    let log_dir = crate::config::standard_data_dir().join("logs");

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

/// Initializes console and file logging. `RUST_LOG` overrides the default
/// `info` filter.
///
/// # Errors
///
/// Returns error if the log directory cannot be created or file appenders fail
pub fn init() -> Result<()> {
    let log_dir = get_log_dir()?;
    let everything = daily_file(&log_dir, "datavista")?;
    let problems = daily_file(&log_dir, "error")?;

    // stdout carries command output
    let console = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(console)
        .with(file_layer(everything))
        .with(file_layer(problems).with_filter(LevelFilter::WARN))
        .init();

    tracing::debug!("Logging to {}", log_dir.display());
    Ok(())
}

fn daily_file(dir: &Path, prefix: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(KEPT_LOG_FILES)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("Failed to open {prefix} log in {}", dir.display()))
}

fn file_layer<S>(writer: RollingFileAppender) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_writer(writer)
}

/// Gets the path to the current log file
pub fn get_current_log_path() -> Result<PathBuf> {
    let log_dir = get_log_dir()?;
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    Ok(log_dir.join(format!("datavista.{today}.log")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_log_dir() {
        let log_dir = get_log_dir().expect("Failed to get log dir");
        assert!(log_dir.ends_with("datavista/logs") || log_dir.ends_with("datavista\\logs"));
    }

    #[test]
    fn test_daily_file_uses_prefix_and_suffix() {
        use std::io::Write as _;

        let dir = tempfile::tempdir().expect("temp dir");
        let mut appender = daily_file(dir.path(), "error").expect("appender");
        appender.write_all(b"disk almost full\n").expect("write");
        appender.flush().expect("flush");

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(|entry| entry.ok()?.file_name().into_string().ok())
            .collect();
        let [name] = names.as_slice() else {
            panic!("expected one log file, found {names:?}");
        };
        assert!(name.starts_with("error."));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn test_current_log_path_is_dated() {
        let path = get_current_log_path().expect("log path");
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        assert!(name.starts_with("datavista."));
        assert!(name.ends_with(".log"));
    }
}
