//! Binance klines adapter for the live BTC/USDT tick.

use std::time::Duration;

use async_trait::async_trait;
use chainseries_core::connector::{ConnectorKey, LiveProvider, SeriesConnector};
use chainseries_core::{Capability, LivePoint, Metric, SeriesError};
use serde_json::Value;

use crate::http::{HttpSource, unsupported_metric};

/// Live provider for [`Metric::Price`] from the latest one-minute candle.
pub struct BinanceConnector {
    pub(crate) http: HttpSource,
}

impl BinanceConnector {
    /// Static connector key for orchestrator priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("binance");
    /// Production endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.binance.com";
    /// Per-request timeout.
    pub const TIMEOUT: Duration = Duration::from_secs(10);

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

/// Extract `(open_time_ms, close)` from the most recent kline row.
fn last_close(rows: &[Vec<Value>]) -> Result<LivePoint, SeriesError> {
    let bad = |what: &str| SeriesError::Data(format!("binance: {what}"));
    let row = rows.last().ok_or_else(|| bad("no klines returned"))?;
    let open_ms = row
        .first()
        .and_then(Value::as_i64)
        .ok_or_else(|| bad("kline open time missing"))?;
    let close = row
        .get(4)
        .and_then(|v| match v {
            Value::String(s) => s.parse::<f64>().ok(),
            other => other.as_f64(),
        })
        .filter(|c| c.is_finite())
        .ok_or_else(|| bad("kline close missing"))?;
    let ts = chrono::DateTime::from_timestamp_millis(open_ms)
        .ok_or_else(|| bad("kline open time out of range"))?;
    Ok(LivePoint { ts, value: close })
}

impl SeriesConnector for BinanceConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Binance"
    }

    fn supports_metric(&self, metric: Metric) -> bool {
        metric == Metric::Price
    }

    fn as_live_provider(&self) -> Option<&dyn LiveProvider> {
        Some(self as &dyn LiveProvider)
    }
}

#[async_trait]
impl LiveProvider for BinanceConnector {
    async fn fetch_live(&self, metric: Metric) -> Result<LivePoint, SeriesError> {
        if !self.supports_metric(metric) {
            return Err(unsupported_metric(Capability::Live, metric));
        }
        let rows: Vec<Vec<Value>> = self
            .http
            .get_json(
                "api/v3/klines",
                &[
                    ("symbol", "BTCUSDT".to_string()),
                    ("interval", "1m".to_string()),
                    ("limit", "60".to_string()),
                ],
                Capability::Live,
            )
            .await?;
        last_close(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn picks_last_row_and_parses_string_close() {
        let rows: Vec<Vec<Value>> = serde_json::from_value(json!([
            [1_710_000_000_000_i64, "1", "2", "0.5", "64000.10", "3"],
            [1_710_000_060_000_i64, "1", "2", "0.5", "64010.25", "3"]
        ]))
        .unwrap();
        let p = last_close(&rows).unwrap();
        assert_eq!(p.value, 64010.25);
        assert_eq!(p.ts.timestamp_millis(), 1_710_000_060_000);
    }

    #[test]
    fn empty_or_short_rows_are_payload_errors() {
        assert!(matches!(last_close(&[]), Err(SeriesError::Data(_))));
        let rows = vec![vec![json!(1_710_000_000_000_i64), json!("1")]];
        assert!(matches!(last_close(&rows), Err(SeriesError::Data(_))));
    }
}
