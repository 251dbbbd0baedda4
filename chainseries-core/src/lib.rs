//! chainseries-core
//!
//! Core types, traits, and utilities shared across the chainseries crates.
//!
//! - `types`: re-exported DTOs (metrics, canonical series, errors, config).
//! - `connector`: the `SeriesConnector` trait and its role traits
//!   (`RangeProvider`, `FullHistoryProvider`, `LiveProvider`).
//! - `timeseries`: normalization, gap detection, live splicing, joins, and
//!   descriptive statistics over canonical series.
//!
#![warn(missing_docs)]

/// Connector role traits and the primary `SeriesConnector` interface.
pub mod connector;
/// Middleware trait implemented by connector wrappers.
pub mod middleware;
/// Time-series utilities for reconciling daily series.
pub mod timeseries;
pub mod types;

pub use connector::SeriesConnector;
pub use middleware::Middleware;
pub use timeseries::gaps::{detect_gaps, detect_gaps_as_of};
pub use timeseries::join::ratio_by_date;
pub use timeseries::merge::{merge_by_priority, overlay};
pub use timeseries::splice::{SpliceOutcome, splice_live};
pub use timeseries::stats::{MetricSnapshot, SeriesSummary, moving_average, snapshot, summarize};
pub use timeseries::util::validate_range;
pub use types::*;
