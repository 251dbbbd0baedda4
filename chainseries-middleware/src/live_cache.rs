use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chainseries_core::connector::{
    FullHistoryProvider, LiveProvider, RangeProvider, SeriesConnector,
};
use chainseries_core::{LivePoint, Metric, Middleware, NaiveDate, SeriesError, TimeSeries};
use moka::future::Cache;

/// Wrapper that memoizes live ticks per metric for a fixed TTL.
///
/// Range and full-history calls pass straight through. Errors are never
/// cached, and concurrent misses for the same metric share one upstream call.
pub struct LiveCachingConnector {
    inner: Arc<dyn SeriesConnector>,
    ticks: Option<Cache<Metric, LivePoint>>,
}

impl LiveCachingConnector {
    /// Wrap `inner`. A zero `ttl` disables caching.
    #[must_use]
    pub fn new(inner: Arc<dyn SeriesConnector>, ttl: Duration) -> Self {
        let ticks = (!ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(64)
                .time_to_live(ttl)
                .build()
        });
        Self { inner, ticks }
    }
}

impl SeriesConnector for LiveCachingConnector {
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
impl RangeProvider for LiveCachingConnector {
    async fn fetch_range(
        &self,
        metric: Metric,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, SeriesError> {
        self.inner
            .as_range_provider()
            .ok_or_else(|| SeriesError::unsupported("range"))?
            .fetch_range(metric, start, end)
            .await
    }
}

#[async_trait]
impl FullHistoryProvider for LiveCachingConnector {
    async fn fetch_full_history(&self, metric: Metric) -> Result<TimeSeries, SeriesError> {
        self.inner
            .as_full_history_provider()
            .ok_or_else(|| SeriesError::unsupported("full-history"))?
            .fetch_full_history(metric)
            .await
    }
}

#[async_trait]
impl LiveProvider for LiveCachingConnector {
    async fn fetch_live(&self, metric: Metric) -> Result<LivePoint, SeriesError> {
        let inner = self
            .inner
            .as_live_provider()
            .ok_or_else(|| SeriesError::unsupported("live"))?;
        match &self.ticks {
            Some(cache) => cache
                .try_get_with(metric, inner.fetch_live(metric))
                .await
                .map_err(|e| (*e).clone()),
            None => inner.fetch_live(metric).await,
        }
    }
}

/// Declarative wrapper that applies live-tick caching when building a connector stack.
pub struct LiveCacheMiddleware {
    ttl: Duration,
}

impl LiveCacheMiddleware {
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

impl Middleware for LiveCacheMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn SeriesConnector>) -> Arc<dyn SeriesConnector> {
        Arc::new(LiveCachingConnector::new(inner, self.ttl))
    }

    fn name(&self) -> &'static str {
        "LiveCacheMiddleware"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ttl_ms": u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX),
        })
    }
}
