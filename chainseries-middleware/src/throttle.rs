//! Minimum spacing between consecutive upstream requests.
//!
//! Free API tiers (Glassnode in particular) reject bursts. The throttle
//! serializes calls through one lock and sleeps until the configured interval
//! since the previous call has elapsed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chainseries_core::connector::{
    FullHistoryProvider, LiveProvider, RangeProvider, SeriesConnector,
};
use chainseries_core::{LivePoint, Metric, Middleware, NaiveDate, SeriesError, TimeSeries};
use chainseries_types::ThrottleConfig;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Wrapper that enforces a minimum interval between calls to its inner connector.
pub struct ThrottledConnector {
    inner: Arc<dyn SeriesConnector>,
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl ThrottledConnector {
    /// Create a throttled wrapper around an existing connector.
    pub fn new(inner: Arc<dyn SeriesConnector>, cfg: ThrottleConfig) -> Self {
        Self {
            inner,
            min_interval: cfg.min_interval,
            last_call: Mutex::new(None),
        }
    }

    async fn wait_turn(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let ready_at = prev + self.min_interval;
            if ready_at > Instant::now() {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    connector = self.inner.name(),
                    wait_ms = u64::try_from((ready_at - Instant::now()).as_millis()).unwrap_or(0),
                    "throttling upstream request"
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl SeriesConnector for ThrottledConnector {
    fn name(&self) -> &'static str {
        self.inner.name()
    }
    fn vendor(&self) -> &'static str {
        self.inner.vendor()
    }
    fn supports_metric(&self, metric: Metric) -> bool {
        self.inner.supports_metric(metric)
    }

    chainseries_core::series_connector_accessors!(inner);
}

#[async_trait]
impl RangeProvider for ThrottledConnector {
    async fn fetch_range(
        &self,
        metric: Metric,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, SeriesError> {
        let inner = self
            .inner
            .as_range_provider()
            .ok_or_else(|| SeriesError::unsupported("range"))?;
        self.wait_turn().await;
        inner.fetch_range(metric, start, end).await
    }
}

#[async_trait]
impl FullHistoryProvider for ThrottledConnector {
    async fn fetch_full_history(&self, metric: Metric) -> Result<TimeSeries, SeriesError> {
        let inner = self
            .inner
            .as_full_history_provider()
            .ok_or_else(|| SeriesError::unsupported("full-history"))?;
        self.wait_turn().await;
        inner.fetch_full_history(metric).await
    }
}

#[async_trait]
impl LiveProvider for ThrottledConnector {
    async fn fetch_live(&self, metric: Metric) -> Result<LivePoint, SeriesError> {
        let inner = self
            .inner
            .as_live_provider()
            .ok_or_else(|| SeriesError::unsupported("live"))?;
        self.wait_turn().await;
        inner.fetch_live(metric).await
    }
}

/// Declarative wrapper that applies throttling when building a connector stack.
pub struct ThrottleMiddleware {
    cfg: ThrottleConfig,
}

impl ThrottleMiddleware {
    #[must_use]
    pub const fn new(cfg: ThrottleConfig) -> Self {
        Self { cfg }
    }
}

impl Middleware for ThrottleMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn SeriesConnector>) -> Arc<dyn SeriesConnector> {
        Arc::new(ThrottledConnector::new(inner, self.cfg))
    }

    fn name(&self) -> &'static str {
        "ThrottlingMiddleware"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "min_interval_ms": u64::try_from(self.cfg.min_interval.as_millis()).unwrap_or(u64::MAX),
        })
    }
}
