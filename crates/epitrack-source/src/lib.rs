//! Upstream loading for epitrack.
//!
//! Fetches the cumulative case table over HTTP or from disk, normalizes it
//! into a [`Snapshot`](epitrack_core::snapshot::Snapshot), and keeps the
//! shared [`SnapshotStore`](epitrack_core::store::SnapshotStore) fresh on a
//! fixed period.

pub mod columns;
pub mod config;
pub mod error;
pub mod file;
pub mod http;
pub mod normalize;
pub mod refresh;

pub use columns::ColumnMap;
pub use config::{Loader, SourceConfig};
pub use error::{Error, Result};
pub use file::FileLoader;
pub use http::HttpLoader;
pub use normalize::parse_csv;
pub use refresh::RefreshScheduler;
