//! Reconciliation pipeline behind the public `SeriesEngine` entry points.

pub(crate) mod chain;
mod metric;
pub mod reconcile;
mod series;
/// Error aggregation helpers.
pub mod util;
