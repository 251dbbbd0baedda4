//! CryptoDataDownload Bitstamp daily CSV adapter.
//!
//! The file starts with a one-line banner before the header row. Column names
//! are matched case-insensitively and rows that fail to parse are dropped.

use std::time::Duration;

use async_trait::async_trait;
use chainseries_core::connector::{ConnectorKey, FullHistoryProvider, SeriesConnector};
use chainseries_core::{Capability, Metric, NaiveDate, SeriesError, TimeSeries};

use crate::http::{HttpSource, non_empty, unsupported_metric};

/// Full-history provider for [`Metric::Price`] backed by the Bitstamp daily CSV.
pub struct CryptoDataDownloadConnector {
    pub(crate) http: HttpSource,
}

impl CryptoDataDownloadConnector {
    /// Static connector key for orchestrator priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("cryptodatadownload");
    /// Production endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://www.cryptodatadownload.com";
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
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
        })
        .ok()
}

/// Parse the banner-prefixed CSV into a price series.
pub(crate) fn parse_csv(body: &str, metric: Metric) -> Result<TimeSeries, SeriesError> {
    let bad = |what: String| SeriesError::Data(format!("cryptodatadownload: {what}"));
    let table = body
        .split_once('\n')
        .map(|(_, rest)| rest)
        .ok_or_else(|| bad("missing header row".to_string()))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(table.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| bad(e.to_string()))?
        .clone();
    let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (Some(date_col), Some(close_col)) = (find("date"), find("close")) else {
        return Err(bad(format!("expected date and close columns, got {headers:?}")));
    };

    let rows = reader.records().filter_map(Result::ok).filter_map(|rec| {
        let date = parse_day(rec.get(date_col)?)?;
        let close = rec.get(close_col)?.parse::<f64>().ok()?;
        close.is_finite().then_some((date, close))
    });
    non_empty(TimeSeries::from_daily(metric, rows), "cryptodatadownload")
}

impl SeriesConnector for CryptoDataDownloadConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "CryptoDataDownload"
    }

    fn supports_metric(&self, metric: Metric) -> bool {
        metric == Metric::Price
    }

    fn as_full_history_provider(&self) -> Option<&dyn FullHistoryProvider> {
        Some(self as &dyn FullHistoryProvider)
    }
}

#[async_trait]
impl FullHistoryProvider for CryptoDataDownloadConnector {
    async fn fetch_full_history(&self, metric: Metric) -> Result<TimeSeries, SeriesError> {
        if !self.supports_metric(metric) {
            return Err(unsupported_metric(Capability::FullHistory, metric));
        }
        let body = self
            .http
            .get_text("cdd/Bitstamp_BTCUSD_d.csv", &[], Capability::FullHistory)
            .await?;
        parse_csv(&body, metric)
    }
}
