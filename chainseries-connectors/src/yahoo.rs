//! Yahoo Finance chart API adapter for `BTC-USD` daily closes.

use std::time::Duration;

use async_trait::async_trait;
use chainseries_core::connector::{
    ConnectorKey, FullHistoryProvider, RangeProvider, SeriesConnector,
};
use chainseries_core::{Capability, Metric, NaiveDate, SeriesError, TimeSeries, validate_range};
use serde::Deserialize;

use crate::http::{HttpSource, day_of_secs, midnight_secs, non_empty, unsupported_metric};

const SYMBOL: &str = "BTC-USD";

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    description: Option<String>,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Range and full-history provider for [`Metric::Price`] backed by Yahoo Finance.
pub struct YahooConnector {
    pub(crate) http: HttpSource,
}

impl YahooConnector {
    /// Static connector key for orchestrator priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("yahoo");
    /// Production endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://query1.finance.yahoo.com";
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

    async fn chart(
        &self,
        metric: Metric,
        query: &[(&str, String)],
        cap: Capability,
    ) -> Result<TimeSeries, SeriesError> {
        if !self.supports_metric(metric) {
            return Err(unsupported_metric(cap, metric));
        }
        let env: ChartEnvelope = self
            .http
            .get_json(&format!("v8/finance/chart/{SYMBOL}"), query, cap)
            .await?;
        parse_chart(env, metric)
    }
}

fn parse_chart(env: ChartEnvelope, metric: Metric) -> Result<TimeSeries, SeriesError> {
    if let Some(err) = env.chart.error {
        return Err(SeriesError::Data(format!(
            "yahoo: {}",
            err.description.unwrap_or_else(|| "chart error".to_string())
        )));
    }
    let result = env
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| SeriesError::Data("yahoo: empty chart result".to_string()))?;
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    // null closes mark days without a print
    let rows = result
        .timestamp
        .into_iter()
        .zip(closes)
        .filter_map(|(ts, close)| Some((day_of_secs(ts)?, close.filter(|c| c.is_finite())?)));
    non_empty(TimeSeries::from_daily(metric, rows), "yahoo")
}

impl SeriesConnector for YahooConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Yahoo"
    }

    fn supports_metric(&self, metric: Metric) -> bool {
        metric == Metric::Price
    }

    fn as_range_provider(&self) -> Option<&dyn RangeProvider> {
        Some(self as &dyn RangeProvider)
    }

    fn as_full_history_provider(&self) -> Option<&dyn FullHistoryProvider> {
        Some(self as &dyn FullHistoryProvider)
    }
}

#[async_trait]
impl RangeProvider for YahooConnector {
    async fn fetch_range(
        &self,
        metric: Metric,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, SeriesError> {
        validate_range(start, end)?;
        // period2 is exclusive
        let end_excl = end.succ_opt().unwrap_or(end);
        let series = self
            .chart(
                metric,
                &[
                    ("period1", midnight_secs(start).to_string()),
                    ("period2", midnight_secs(end_excl).to_string()),
                    ("interval", "1d".to_string()),
                ],
                Capability::Range,
            )
            .await?;
        Ok(series.between(start, end))
    }
}

#[async_trait]
impl FullHistoryProvider for YahooConnector {
    async fn fetch_full_history(&self, metric: Metric) -> Result<TimeSeries, SeriesError> {
        self.chart(
            metric,
            &[
                ("range", "max".to_string()),
                ("interval", "1d".to_string()),
            ],
            Capability::FullHistory,
        )
        .await
    }
}
