use async_trait::async_trait;
use chrono::NaiveDate;

pub use chainseries_types::ConnectorKey;

use crate::{LivePoint, Metric, SeriesError, TimeSeries};

/// Focused role trait for connectors that serve a bounded range of daily observations.
#[async_trait]
pub trait RangeProvider: Send + Sync {
    /// Fetch daily observations of `metric` for the inclusive range `[start, end]`.
    ///
    /// Implementations must reject `start > end` with `InvalidArg` before
    /// issuing any request, and return a normalized series (sorted ascending,
    /// unique by timestamp) in the metric's canonical unit.
    async fn fetch_range(
        &self,
        metric: Metric,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, SeriesError>;
}

/// Focused role trait for connectors that serve every observation they have.
#[async_trait]
pub trait FullHistoryProvider: Send + Sync {
    /// Fetch the complete daily history of `metric`.
    async fn fetch_full_history(&self, metric: Metric) -> Result<TimeSeries, SeriesError>;
}

/// Focused role trait for connectors that serve a near-real-time tick.
#[async_trait]
pub trait LiveProvider: Send + Sync {
    /// Fetch the latest observation of `metric`.
    async fn fetch_live(&self, metric: Metric) -> Result<LivePoint, SeriesError>;
}

/// Main connector trait implemented by source adapters. Exposes capability discovery.
pub trait SeriesConnector: Send + Sync {
    /// A stable identifier for priority lists (e.g., "coingecko", "binance").
    fn name(&self) -> &'static str;

    /// Canonical connector key constructed from the static name.
    ///
    /// Use this helper when configuring per-metric priorities.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Whether this connector *claims* to serve a given metric.
    ///
    /// Default: returns `false` for all metrics. Connectors must explicitly override
    /// this method to declare which metrics they support.
    fn supports_metric(&self, metric: Metric) -> bool {
        let _ = metric;
        false
    }

    /// Advertise range capability by returning a usable trait object reference when supported.
    fn as_range_provider(&self) -> Option<&dyn RangeProvider> {
        None
    }

    /// Advertise full-history capability by returning a usable trait object reference when supported.
    fn as_full_history_provider(&self) -> Option<&dyn FullHistoryProvider> {
        None
    }

    /// Advertise live capability by returning a usable trait object reference when supported.
    fn as_live_provider(&self) -> Option<&dyn LiveProvider> {
        None
    }
}

/// Generate `as_*_provider` accessors for a wrapper that implements
/// `SeriesConnector` by delegating to an inner field.
///
/// The wrapper must itself implement every role trait it may advertise.
#[macro_export]
macro_rules! series_connector_accessors {
    ($inner:ident) => {
        fn as_range_provider(&self) -> Option<&dyn $crate::connector::RangeProvider> {
            if self.$inner.as_range_provider().is_some() {
                Some(self as &dyn $crate::connector::RangeProvider)
            } else {
                None
            }
        }
        fn as_full_history_provider(
            &self,
        ) -> Option<&dyn $crate::connector::FullHistoryProvider> {
            if self.$inner.as_full_history_provider().is_some() {
                Some(self as &dyn $crate::connector::FullHistoryProvider)
            } else {
                None
            }
        }
        fn as_live_provider(&self) -> Option<&dyn $crate::connector::LiveProvider> {
            if self.$inner.as_live_provider().is_some() {
                Some(self as &dyn $crate::connector::LiveProvider)
            } else {
                None
            }
        }
    };
}
