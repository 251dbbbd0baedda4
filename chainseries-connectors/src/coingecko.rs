//! CoinGecko `market_chart` adapter for daily BTC/USD closes.

use std::time::Duration;

use async_trait::async_trait;
use chainseries_core::connector::{ConnectorKey, RangeProvider, SeriesConnector};
use chainseries_core::{Capability, Metric, NaiveDate, SeriesError, TimeSeries, validate_range};
use serde::Deserialize;

use crate::http::{HttpSource, day_of_millis, non_empty, unsupported_metric};

/// The free API only serves daily granularity for up to a year back.
const MAX_DAYS: i64 = 365;

#[derive(Deserialize)]
struct MarketChart {
    prices: Vec<(f64, Option<f64>)>,
}

/// Range provider for [`Metric::Price`] backed by CoinGecko.
pub struct CoinGeckoConnector {
    pub(crate) http: HttpSource,
}

impl CoinGeckoConnector {
    /// Static connector key for orchestrator priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("coingecko");
    /// Production endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.coingecko.com/api/v3";
    /// Per-request timeout.
    pub const TIMEOUT: Duration = Duration::from_secs(15);

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

    /// Days of history to request so that `start` is covered.
    fn days_param(start: NaiveDate, end: NaiveDate) -> i64 {
        ((end - start).num_days() + 2).clamp(1, MAX_DAYS)
    }
}

impl SeriesConnector for CoinGeckoConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "CoinGecko"
    }

    fn supports_metric(&self, metric: Metric) -> bool {
        metric == Metric::Price
    }

    fn as_range_provider(&self) -> Option<&dyn RangeProvider> {
        Some(self as &dyn RangeProvider)
    }
}

#[async_trait]
impl RangeProvider for CoinGeckoConnector {
    async fn fetch_range(
        &self,
        metric: Metric,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, SeriesError> {
        validate_range(start, end)?;
        if !self.supports_metric(metric) {
            return Err(unsupported_metric(Capability::Range, metric));
        }
        let chart: MarketChart = self
            .http
            .get_json(
                "coins/bitcoin/market_chart",
                &[
                    ("vs_currency", "usd".to_string()),
                    ("days", Self::days_param(start, end).to_string()),
                    ("interval", "daily".to_string()),
                ],
                Capability::Range,
            )
            .await?;

        #[allow(clippy::cast_possible_truncation)]
        let rows = chart.prices.into_iter().filter_map(|(ms, price)| {
            let price = price.filter(|p| p.is_finite())?;
            Some((day_of_millis(ms as i64)?, price))
        });
        let series = non_empty(TimeSeries::from_daily(metric, rows), Self::KEY.as_str())?;
        Ok(series.between(start, end))
    }
}
