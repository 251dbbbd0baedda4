//! chainseries-mock
//!
//! Deterministic connectors for CI-safe tests and demos.
//!
//! - [`MockConnector`] serves fixture data for every metric and capability.
//! - [`DynamicMockConnector`] defers every call to a [`DynamicMockController`]
//!   so tests can script returns, failures, and hangs per metric.

use std::time::Duration;

use async_trait::async_trait;
use chainseries_core::connector::{
    FullHistoryProvider, LiveProvider, RangeProvider, SeriesConnector,
};
use chainseries_core::{LivePoint, Metric, NaiveDate, SeriesError, TimeSeries, Utc};

mod dynamic;
pub mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior, MockCall};

/// Mock connector for CI-safe examples. Provides deterministic data from fixtures.
pub struct MockConnector {
    name: &'static str,
    latency: Option<Duration>,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Connector name used by [`MockConnector::new`].
    pub const NAME: &'static str = "chainseries-mock";

    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: Self::NAME,
            latency: None,
        }
    }

    /// Same fixtures under a different connector name.
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self {
            name,
            latency: None,
        }
    }

    /// Delay every call, e.g. to exercise orchestrator timeouts.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn simulate_latency(&self) {
        if let Some(d) = self.latency {
            tokio::time::sleep(d).await;
        }
    }
}

impl SeriesConnector for MockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn supports_metric(&self, _metric: Metric) -> bool {
        true
    }

    fn as_range_provider(&self) -> Option<&dyn RangeProvider> {
        Some(self as &dyn RangeProvider)
    }

    fn as_full_history_provider(&self) -> Option<&dyn FullHistoryProvider> {
        Some(self as &dyn FullHistoryProvider)
    }

    fn as_live_provider(&self) -> Option<&dyn LiveProvider> {
        Some(self as &dyn LiveProvider)
    }
}

#[async_trait]
impl RangeProvider for MockConnector {
    async fn fetch_range(
        &self,
        metric: Metric,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, SeriesError> {
        chainseries_core::validate_range(start, end)?;
        self.simulate_latency().await;
        Ok(fixtures::daily(metric, start, end))
    }
}

#[async_trait]
impl FullHistoryProvider for MockConnector {
    async fn fetch_full_history(&self, metric: Metric) -> Result<TimeSeries, SeriesError> {
        self.simulate_latency().await;
        Ok(fixtures::history(metric))
    }
}

#[async_trait]
impl LiveProvider for MockConnector {
    async fn fetch_live(&self, metric: Metric) -> Result<LivePoint, SeriesError> {
        self.simulate_latency().await;
        let now = Utc::now();
        Ok(LivePoint {
            ts: now,
            value: fixtures::value(metric, now.date_naive()),
        })
    }
}
