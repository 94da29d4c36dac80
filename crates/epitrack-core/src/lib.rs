//! Core types and algorithms for the epitrack case-count pipeline.
//!
//! Owns the canonical row schema, the swappable snapshot store, series
//! correction and derivation, and the read-side [`query::QueryFacade`]. No
//! HTTP and no async runtime: loading the upstream table lives in
//! `epitrack-source`, transport in `epitrack-api`.

pub mod chart;
pub mod correct;
pub mod derive;
pub mod error;
pub mod observation;
pub mod query;
pub mod snapshot;
pub mod store;
pub mod summary;

pub use error::{Error, Result};
pub use observation::{ALL_SUBDIVISIONS, Counters, Observation};
