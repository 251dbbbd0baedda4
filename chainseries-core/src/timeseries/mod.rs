//! Time-series utilities shared by connectors and the orchestrator.
//!
//! Modules include:
//! - `gaps`: detect missing calendar days beyond a tolerance
//! - `merge`: combine series with first-wins or last-wins precedence
//! - `splice`: overwrite or append today's point from a live tick
//! - `join`: date-aligned ratio of two series
//! - `stats`: descriptive aggregates for dashboards
/// Gap detection over daily series.
pub mod gaps;
/// Inner-join helpers for derived metrics.
pub mod join;
/// Merge utilities for joining multiple provider series.
pub mod merge;
/// Live-tick splicing.
pub mod splice;
/// Descriptive statistics.
pub mod stats;
/// Shared validation helpers.
pub mod util;
