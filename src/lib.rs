//! # Datavista - Dataset Upload and Exploration Library
//!
//! Datavista lets authenticated users upload tabular datasets, keeps them in
//! a SQLite store as self-describing binary blobs, and produces statistics
//! and chart-ready projections over any stored dataset.
//!
//! ## Quick Start
//!
//! ```no_run
//! use datavista::analyser::View;
//! use datavista::config::AppConfig;
//! use datavista::explorer::Explorer;
//! use polars::prelude::*;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let explorer = Explorer::open(AppConfig::default()).await?;
//! let session = explorer.sign_up("alice", "correct horse").await?;
//!
//! let sales = df!["item" => ["pen", "ink"], "amount" => [3.5, 1.25]]?;
//! let id = explorer.upload(&session, "sales", "Q1 sales", &sales).await?;
//!
//! let page = explorer.explore(&session, id, &View::Info).await?;
//! println!("{}", serde_json::to_string_pretty(&page)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`explorer`]: Sessions, uploads and exploration over one database
//! - [`storage`]: Credential store, dataset repository and the table codec
//! - [`analyser`]: Column classification, statistics and chart projections
//!   - [`analyser::logic`]: Statistics over classified tables
//!   - [`analyser::charts`]: Chart-ready data for each chart kind
//! - [`config`]: Application settings
//! - [`error`]: Error types and handling utilities
//! - [`logging`]: Console and rolling file logs
//!
//! ## Column Classes
//!
//! Every loaded table is split once into numeric (integer and float),
//! categorical (string) and other columns. Chart and statistics functions take
//! the classified table and report [`error::ExplorerError::InsufficientColumns`]
//! when the classes they need are missing.

#![warn(clippy::all, rust_2018_idioms)]

pub mod analyser;
pub mod config;
pub mod error;
pub mod explorer;
pub mod logging;
pub mod storage;
