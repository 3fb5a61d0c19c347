//! Persistence: user credentials and uploaded datasets in one SQLite store.
//!
//! Tables travel through the store as opaque blobs produced by [`codec`]; the
//! database never sees individual columns.

pub mod codec;
pub mod credentials;
pub mod datasets;
pub mod db;

pub use codec::{FORMAT_VERSION, decode, encode};
pub use credentials::CredentialStore;
pub use datasets::{DatasetId, DatasetMeta, DatasetRepository};
pub use db::DbClient;
