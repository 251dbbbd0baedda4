use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chainseries_core::connector::{
    FullHistoryProvider, LiveProvider, RangeProvider, SeriesConnector,
};
use chainseries_core::{LivePoint, Metric, Middleware, NaiveDate, SeriesError, TimeSeries};

/// Middleware that blacklists its inner connector for a period after the
/// upstream signals a rate limit.
pub struct BlacklistingMiddleware {
    inner: Arc<dyn SeriesConnector>,
    state: Mutex<Option<Instant>>, // blacklist-until; None means active
    duration: Duration,
}

impl BlacklistingMiddleware {
    pub fn new(inner: Arc<dyn SeriesConnector>, duration: Duration) -> Self {
        Self {
            inner,
            state: Mutex::new(None),
            duration,
        }
    }

    /// Remaining blacklist time, or `None` when the connector is active.
    fn remaining(&self) -> Option<Duration> {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        match *guard {
            Some(until) if now < until => Some(until - now),
            Some(_) => {
                // expired
                *guard = None;
                None
            }
            None => None,
        }
    }

    fn check(&self) -> Result<(), SeriesError> {
        match self.remaining() {
            Some(left) => Err(SeriesError::TemporarilyBlacklisted {
                reset_in_ms: u64::try_from(left.as_millis()).unwrap_or(u64::MAX),
            }),
            None => Ok(()),
        }
    }

    fn handle_error(&self, err: SeriesError) -> SeriesError {
        if err.is_rate_limited() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                connector = self.inner.name(),
                duration_ms = u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX),
                "upstream rate limit hit; blacklisting connector"
            );
            let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            *guard = Some(Instant::now() + self.duration);
        }
        err
    }
}

impl SeriesConnector for BlacklistingMiddleware {
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
impl RangeProvider for BlacklistingMiddleware {
    async fn fetch_range(
        &self,
        metric: Metric,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, SeriesError> {
        self.check()?;
        let inner = self
            .inner
            .as_range_provider()
            .ok_or_else(|| SeriesError::unsupported("range"))?;
        inner
            .fetch_range(metric, start, end)
            .await
            .map_err(|e| self.handle_error(e))
    }
}

#[async_trait]
impl FullHistoryProvider for BlacklistingMiddleware {
    async fn fetch_full_history(&self, metric: Metric) -> Result<TimeSeries, SeriesError> {
        self.check()?;
        let inner = self
            .inner
            .as_full_history_provider()
            .ok_or_else(|| SeriesError::unsupported("full-history"))?;
        inner
            .fetch_full_history(metric)
            .await
            .map_err(|e| self.handle_error(e))
    }
}

#[async_trait]
impl LiveProvider for BlacklistingMiddleware {
    async fn fetch_live(&self, metric: Metric) -> Result<LivePoint, SeriesError> {
        self.check()?;
        let inner = self
            .inner
            .as_live_provider()
            .ok_or_else(|| SeriesError::unsupported("live"))?;
        inner
            .fetch_live(metric)
            .await
            .map_err(|e| self.handle_error(e))
    }
}

/// Declarative wrapper that applies blacklisting when building a connector stack.
pub struct BlacklistMiddleware {
    duration: Duration,
}

impl BlacklistMiddleware {
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl Middleware for BlacklistMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn SeriesConnector>) -> Arc<dyn SeriesConnector> {
        Arc::new(BlacklistingMiddleware::new(inner, self.duration))
    }

    fn name(&self) -> &'static str {
        "BlacklistingMiddleware"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "duration_ms": u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX),
        })
    }
}
