//! chainseries keeps daily Bitcoin price and on-chain series complete and current.
//!
//! Overview
//! - Reads per-metric CSV tables from a local cache directory.
//! - Bootstraps a missing series from full-history providers, falling back to
//!   range providers.
//! - Detects missing calendar days and fills them from range providers in a
//!   configurable per-metric priority order.
//! - Splices a near-real-time tick in as today's point.
//! - Persists the reconciled series and reports where the data came from.
//!
//! Failure policy
//! - Upstream failures never abort a call. They are logged with a stable
//!   `reason` code and collected in [`Dataset::warnings`].
//! - A stale cache is returned when refreshing it fails.
//! - Only "no cache and no upstream data" yields `None`, unless a sample
//!   fallback was registered, in which case it is returned tagged
//!   [`DataSource::SampleFallback`].
//!
//! Example
//! ```rust,ignore
//! use chainseries::SeriesEngine;
//! use chainseries_core::Metric;
//! use chainseries_connectors::{MempoolConnector, BlockchainComConnector};
//!
//! let engine = SeriesEngine::builder()
//!     .with_connector(MempoolConnector::rate_limited().build())
//!     .with_connector(BlockchainComConnector::rate_limited().build())
//!     .build()?;
//!
//! let end = engine.today();
//! let start = end - chrono::Days::new(90);
//! let hash_rate = engine.fetch_metric(Metric::HashRate, start, end).await;
//! ```
#![warn(missing_docs)]

/// Per-metric on-disk cache.
pub mod cache;
pub(crate) mod core;
/// Reconciliation pipeline.
pub mod pipeline;

pub use cache::{CacheEntry, CacheStore};
pub use crate::core::{SeriesEngine, SeriesEngineBuilder, tag_err};
pub use pipeline::reconcile::Reconciled;
pub use pipeline::util::collapse_errors;

pub use chainseries_core::{
    Attribution, Capability, DataSource, Dataset, EngineConfig, Gap, Metric, SeriesError, Span,
    TimeSeries,
};
