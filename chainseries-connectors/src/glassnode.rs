//! Glassnode metrics adapter.
//!
//! Every request needs an API key. Without one the adapter fails fast with
//! `MissingApiKey` and never touches the network. The free tier is strict
//! about request rates, so [`GlassnodeConnector::rate_limited`] is the
//! recommended constructor.

use std::time::Duration;

use async_trait::async_trait;
use chainseries_core::connector::{ConnectorKey, RangeProvider, SeriesConnector};
use chainseries_core::{Capability, Metric, NaiveDate, SeriesError, TimeSeries, validate_range};
use serde::Deserialize;

use crate::http::{HttpSource, day_of_secs, midnight_secs, non_empty, unsupported_metric};
use crate::mempool::EXA;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GLASSNODE_API_KEY";

#[derive(Deserialize)]
struct Observation {
    t: Option<i64>,
    v: Option<f64>,
}

/// Endpoint path and divisor into canonical units.
const fn endpoint(metric: Metric) -> Option<(&'static str, f64)> {
    match metric {
        Metric::MvrvRatio => Some(("market/mvrv", 1.0)),
        Metric::Sopr => Some(("indicators/sopr", 1.0)),
        Metric::ActiveAddresses => Some(("addresses/active_count", 1.0)),
        Metric::HashRate => Some(("mining/hash_rate_mean", EXA)),
        Metric::LthSupply => Some(("supply/lth_sum", 1.0)),
        Metric::NvtRatio => Some(("indicators/nvt", 1.0)),
        _ => None,
    }
}

/// Range provider for valuation and holder metrics backed by Glassnode.
pub struct GlassnodeConnector {
    pub(crate) http: HttpSource,
    pub(crate) api_key: Option<String>,
}

impl GlassnodeConnector {
    /// Static connector key for orchestrator priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("glassnode");
    /// Production endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.glassnode.com/v1/metrics";
    /// Per-request timeout.
    pub const TIMEOUT: Duration = Duration::from_secs(30);

    /// Build against a custom base URL with an explicit key.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `base_url` is not an absolute URL.
    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Result<Self, SeriesError> {
        Ok(Self {
            http: HttpSource::new(Self::KEY.as_str(), base_url, Self::TIMEOUT)?,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Read the key from `GLASSNODE_API_KEY`; an unset or blank variable leaves it absent.
    #[must_use]
    pub fn api_key_from_env() -> Option<String> {
        std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty())
    }

    /// Whether a key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

impl SeriesConnector for GlassnodeConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Glassnode"
    }

    fn supports_metric(&self, metric: Metric) -> bool {
        endpoint(metric).is_some()
    }

    fn as_range_provider(&self) -> Option<&dyn RangeProvider> {
        Some(self as &dyn RangeProvider)
    }
}

#[async_trait]
impl RangeProvider for GlassnodeConnector {
    async fn fetch_range(
        &self,
        metric: Metric,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, SeriesError> {
        validate_range(start, end)?;
        let Some((path, divisor)) = endpoint(metric) else {
            return Err(unsupported_metric(Capability::Range, metric));
        };
        let Some(key) = self.api_key.as_deref() else {
            return Err(SeriesError::MissingApiKey {
                connector: Self::KEY.as_str().to_string(),
            });
        };
        let until = end.succ_opt().unwrap_or(end);
        let rows: Vec<Observation> = self
            .http
            .get_json(
                path,
                &[
                    ("a", "BTC".to_string()),
                    ("s", midnight_secs(start).to_string()),
                    ("u", midnight_secs(until).to_string()),
                    ("i", "24h".to_string()),
                    ("api_key", key.to_string()),
                ],
                Capability::Range,
            )
            .await?;
        let parsed = rows
            .into_iter()
            .filter_map(|o| Some((day_of_secs(o.t?)?, o.v.filter(|v| v.is_finite())? / divisor)));
        let series = non_empty(TimeSeries::from_daily(metric, parsed), "glassnode")?;
        Ok(series.between(start, end))
    }
}
