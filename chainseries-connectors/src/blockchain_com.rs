//! Blockchain.com charts adapter.
//!
//! Each chart serves a trailing one-year window of `{x, y}` points. The NVT
//! ratio has no chart of its own and is derived from market cap over
//! estimated USD transaction volume.

use std::time::Duration;

use async_trait::async_trait;
use chainseries_core::connector::{ConnectorKey, RangeProvider, SeriesConnector};
use chainseries_core::{
    Capability, Metric, NaiveDate, SeriesError, TimeSeries, ratio_by_date, validate_range,
};
use serde::Deserialize;

use crate::http::{HttpSource, day_of_secs, non_empty, unsupported_metric};

#[derive(Deserialize)]
struct ChartResponse {
    #[serde(default)]
    values: Vec<ChartPoint>,
}

#[derive(Deserialize)]
struct ChartPoint {
    x: Option<i64>,
    y: Option<f64>,
}

/// Chart slug for metrics served directly by a chart.
const fn chart_name(metric: Metric) -> Option<&'static str> {
    match metric {
        Metric::ActiveAddresses => Some("n-unique-addresses"),
        Metric::TransactionCount => Some("n-transactions"),
        Metric::MinerRevenue => Some("miners-revenue"),
        Metric::MarketCap => Some("market-cap"),
        Metric::TransactionVolume => Some("estimated-transaction-volume-usd"),
        _ => None,
    }
}

/// Range provider for network activity charts and the derived NVT ratio.
pub struct BlockchainComConnector {
    pub(crate) http: HttpSource,
}

impl BlockchainComConnector {
    /// Static connector key for orchestrator priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("blockchain-com");
    /// Production endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.blockchain.info";
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

    async fn chart(&self, metric: Metric, chart: &str) -> Result<TimeSeries, SeriesError> {
        let resp: ChartResponse = self
            .http
            .get_json(
                &format!("charts/{chart}"),
                &[
                    ("timespan", "1year".to_string()),
                    ("format", "json".to_string()),
                ],
                Capability::Range,
            )
            .await?;
        let rows = resp
            .values
            .into_iter()
            .filter_map(|p| Some((day_of_secs(p.x?)?, p.y.filter(|y| y.is_finite())?)));
        non_empty(TimeSeries::from_daily(metric, rows), "blockchain-com")
    }

    async fn nvt(&self) -> Result<TimeSeries, SeriesError> {
        let cap = self.chart(Metric::MarketCap, "market-cap").await?;
        let volume = self
            .chart(
                Metric::TransactionVolume,
                "estimated-transaction-volume-usd",
            )
            .await?;
        let nvt = ratio_by_date(&cap, &volume, Metric::NvtRatio)?;
        non_empty(nvt, "blockchain-com")
    }
}

impl SeriesConnector for BlockchainComConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Blockchain.com"
    }

    fn supports_metric(&self, metric: Metric) -> bool {
        metric == Metric::NvtRatio || chart_name(metric).is_some()
    }

    fn as_range_provider(&self) -> Option<&dyn RangeProvider> {
        Some(self as &dyn RangeProvider)
    }
}

#[async_trait]
impl RangeProvider for BlockchainComConnector {
    async fn fetch_range(
        &self,
        metric: Metric,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, SeriesError> {
        validate_range(start, end)?;
        let series = match (metric, chart_name(metric)) {
            (Metric::NvtRatio, _) => self.nvt().await?,
            (_, Some(chart)) => self.chart(metric, chart).await?,
            (other, None) => return Err(unsupported_metric(Capability::Range, other)),
        };
        Ok(series.between(start, end))
    }
}
