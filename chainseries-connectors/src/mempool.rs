//! mempool.space mining statistics adapter.
//!
//! Both endpoints only serve a trailing one-year window. Range requests fetch
//! that window and clip it.

use std::time::Duration;

use async_trait::async_trait;
use chainseries_core::connector::{ConnectorKey, RangeProvider, SeriesConnector};
use chainseries_core::{Capability, Metric, NaiveDate, SeriesError, TimeSeries, validate_range};
use serde::Deserialize;
use serde_json::Value;

use crate::http::{HttpSource, day_of_secs, non_empty, unsupported_metric};

/// Hashes per second in one exahash per second.
pub(crate) const EXA: f64 = 1e18;

#[derive(Deserialize)]
struct HashrateResponse {
    #[serde(default)]
    hashrates: Vec<HashrateRow>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HashrateRow {
    timestamp: Option<i64>,
    avg_hashrate: Option<f64>,
}

/// Range provider for hash rate, difficulty, and difficulty adjustments.
pub struct MempoolConnector {
    pub(crate) http: HttpSource,
}

impl MempoolConnector {
    /// Static connector key for orchestrator priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("mempool");
    /// Production endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://mempool.space/api/v1";
    /// Per-request timeout.
    pub const TIMEOUT: Duration = Duration::from_secs(30);

    /// Build against a custom base URL (e.g. a mock server or proxy).
    ///
    /// # Errors
    /// Returns `InvalidArg` if `base_url` is not an absolute URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, SeriesError> {
        Ok(Self {
            http: HttpSource::new(Self::KEY.as_str(), base_url, Self::TIMEOUT)?,
        })
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    async fn hash_rate(&self) -> Result<TimeSeries, SeriesError> {
        let resp: HashrateResponse = self
            .http
            .get_json("mining/hashrate/1y", &[], Capability::Range)
            .await?;
        let rows = resp.hashrates.into_iter().filter_map(|r| {
            let day = day_of_secs(r.timestamp?)?;
            Some((day, r.avg_hashrate? / EXA))
        });
        non_empty(TimeSeries::from_daily(Metric::HashRate, rows), "mempool")
    }

    /// `[[timestamp, height, difficulty, adjustment], ...]`
    async fn adjustments(&self, metric: Metric) -> Result<TimeSeries, SeriesError> {
        let rows: Vec<Vec<Value>> = self
            .http
            .get_json("mining/difficulty-adjustments/1y", &[], Capability::Range)
            .await?;
        let column = if metric == Metric::Difficulty { 2 } else { 3 };
        let parsed = rows.iter().filter(|r| r.len() >= 4).filter_map(|r| {
            let day = day_of_secs(r[0].as_i64()?)?;
            Some((day, r[column].as_f64()?))
        });
        non_empty(TimeSeries::from_daily(metric, parsed), "mempool")
    }
}

impl SeriesConnector for MempoolConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "mempool.space"
    }

    fn supports_metric(&self, metric: Metric) -> bool {
        matches!(
            metric,
            Metric::HashRate | Metric::Difficulty | Metric::DifficultyAdjustment
        )
    }

    fn as_range_provider(&self) -> Option<&dyn RangeProvider> {
        Some(self as &dyn RangeProvider)
    }
}

#[async_trait]
impl RangeProvider for MempoolConnector {
    async fn fetch_range(
        &self,
        metric: Metric,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, SeriesError> {
        validate_range(start, end)?;
        let series = match metric {
            Metric::HashRate => self.hash_rate().await?,
            Metric::Difficulty | Metric::DifficultyAdjustment => self.adjustments(metric).await?,
            other => return Err(unsupported_metric(Capability::Range, other)),
        };
        Ok(series.between(start, end))
    }
}
