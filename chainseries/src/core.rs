use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chainseries_core::connector::ConnectorKey;
use chainseries_core::{
    Capability, EngineConfig, Metric, NaiveDate, SeriesConnector, SeriesError, TimeSeries, Utc,
};

use crate::cache::CacheStore;

/// Connector key of the bulk CSV history source.
const CRYPTODATADOWNLOAD: ConnectorKey = ConnectorKey::new("cryptodatadownload");
/// Connector key of the chart API used as secondary bulk source and gap filler.
const YAHOO: ConnectorKey = ConnectorKey::new("yahoo");
/// Connector key of the primary daily gap filler.
const COINGECKO: ConnectorKey = ConnectorKey::new("coingecko");
/// Connector key of the live ticker.
const BINANCE: ConnectorKey = ConnectorKey::new("binance");

type PriorityMap = HashMap<(Metric, Capability), Vec<ConnectorKey>>;

/// Orchestrator that keeps cached metric series complete and current.
pub struct SeriesEngine {
    pub(crate) connectors: Vec<Arc<dyn SeriesConnector>>,
    pub(crate) cfg: EngineConfig,
    pub(crate) cache: CacheStore,
    pub(crate) priorities: PriorityMap,
    pub(crate) samples: HashMap<Metric, TimeSeries>,
    pub(crate) today: Option<NaiveDate>,
}

/// Builder for constructing a [`SeriesEngine`].
pub struct SeriesEngineBuilder {
    connectors: Vec<Arc<dyn SeriesConnector>>,
    cfg: EngineConfig,
    priorities: PriorityMap,
    samples: HashMap<Metric, TimeSeries>,
    today: Option<NaiveDate>,
}

impl Default for SeriesEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_priorities() -> PriorityMap {
    let mut out = PriorityMap::new();
    out.insert(
        (Metric::Price, Capability::FullHistory),
        vec![CRYPTODATADOWNLOAD, YAHOO],
    );
    out.insert((Metric::Price, Capability::Range), vec![COINGECKO, YAHOO]);
    out.insert((Metric::Price, Capability::Live), vec![BINANCE]);
    out
}

impl SeriesEngineBuilder {
    /// Create a builder with default configuration and no connectors.
    ///
    /// Price defaults to bootstrapping from CryptoDataDownload then Yahoo,
    /// filling gaps from CoinGecko then Yahoo, and splicing Binance ticks.
    /// These orderings only apply to connectors that are registered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connectors: vec![],
            cfg: EngineConfig::default(),
            priorities: default_priorities(),
            samples: HashMap::new(),
            today: None,
        }
    }

    /// Register a provider connector.
    ///
    /// Registration order is the fallback order for metrics and capabilities
    /// without an explicit priority list.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn SeriesConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Register several connectors at once, keeping their order.
    #[must_use]
    pub fn with_connectors<I>(mut self, connectors: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn SeriesConnector>>,
    {
        self.connectors.extend(connectors);
        self
    }

    /// Set the provider order for one metric and capability using connector instances.
    ///
    /// Listed connectors are tried first, in order; unlisted but capable
    /// connectors are still tried after them.
    #[must_use]
    pub fn prefer_for_metric(
        self,
        metric: Metric,
        capability: Capability,
        connectors_desc: &[Arc<dyn SeriesConnector>],
    ) -> Self {
        let keys: Vec<ConnectorKey> = connectors_desc.iter().map(|c| c.key()).collect();
        self.prefer_keys_for_metric(metric, capability, &keys)
    }

    /// Set the provider order for one metric and capability using connector keys.
    #[must_use]
    pub fn prefer_keys_for_metric(
        mut self,
        metric: Metric,
        capability: Capability,
        keys: &[ConnectorKey],
    ) -> Self {
        self.priorities.insert((metric, capability), keys.to_vec());
        self
    }

    /// Replace the whole engine configuration.
    #[must_use]
    pub fn config(mut self, cfg: EngineConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Directory holding the per-metric cache files.
    #[must_use]
    pub fn cache_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.cfg.cache_dir = dir.into();
        self
    }

    /// Age after which cached data is refreshed from upstream.
    #[must_use]
    pub const fn cache_validity(mut self, validity: Duration) -> Self {
        self.cfg.cache_validity = validity;
        self
    }

    /// Consecutive points further apart than this many days delimit a gap.
    #[must_use]
    pub const fn gap_tolerance_days(mut self, days: i64) -> Self {
        self.cfg.gap_tolerance_days = days;
        self
    }

    /// Bound each provider call.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Bound one whole `get_series` or `fetch_metric` call.
    ///
    /// When exceeded, the call degrades to whatever the cache holds.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Earliest day requested when bootstrapping through range providers.
    #[must_use]
    pub const fn bootstrap_start(mut self, day: NaiveDate) -> Self {
        self.cfg.bootstrap_start = day;
        self
    }

    /// Register a placeholder series returned when no real data exists.
    ///
    /// Datasets built from it are tagged `DataSource::SampleFallback`.
    #[must_use]
    pub fn sample_fallback(mut self, series: TimeSeries) -> Self {
        self.samples.insert(series.metric(), series);
        self
    }

    /// Pin the engine's notion of "today" (UTC). Defaults to the system clock.
    #[must_use]
    pub const fn today(mut self, day: NaiveDate) -> Self {
        self.today = Some(day);
        self
    }

    /// Build the engine.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connectors are registered or the gap
    /// tolerance is negative.
    pub fn build(mut self) -> Result<SeriesEngine, SeriesError> {
        if self.connectors.is_empty() {
            return Err(SeriesError::InvalidArg(
                "no connectors registered; add at least one via with_connector(...)".to_string(),
            ));
        }
        if self.cfg.gap_tolerance_days < 0 {
            return Err(SeriesError::InvalidArg(format!(
                "gap tolerance must be non-negative, got {}",
                self.cfg.gap_tolerance_days
            )));
        }

        // Drop keys of unregistered connectors and duplicates.
        let known: HashSet<&'static str> = self.connectors.iter().map(|c| c.name()).collect();
        for keys in self.priorities.values_mut() {
            let mut seen: HashSet<&'static str> = HashSet::new();
            keys.retain(|k| known.contains(k.as_str()) && seen.insert(k.as_str()));
        }

        Ok(SeriesEngine {
            cache: CacheStore::new(self.cfg.cache_dir.clone()),
            connectors: self.connectors,
            cfg: self.cfg,
            priorities: self.priorities,
            samples: self.samples,
            today: self.today,
        })
    }
}

/// Attach the connector name to errors that do not already carry it.
pub fn tag_err(connector: &str, e: SeriesError) -> SeriesError {
    match e {
        e @ (SeriesError::NotFound { .. }
        | SeriesError::ProviderTimeout { .. }
        | SeriesError::Connector { .. }
        | SeriesError::Connect { .. }
        | SeriesError::HttpStatus { .. }
        | SeriesError::MissingApiKey { .. }
        | SeriesError::RequestTimeout { .. }
        | SeriesError::AllProvidersTimedOut { .. }
        | SeriesError::AllProvidersFailed(_)) => e,
        other => SeriesError::Connector {
            connector: connector.to_string(),
            msg: other.to_string(),
        },
    }
}

/// Run `fut` under an optional overall deadline.
pub(crate) async fn with_request_deadline<F, T>(
    deadline: Option<Duration>,
    capability: &'static str,
    fut: F,
) -> Result<T, SeriesError>
where
    F: core::future::Future<Output = T>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .map_err(|_| SeriesError::request_timeout(capability)),
        None => Ok(fut.await),
    }
}

impl SeriesEngine {
    /// Start building a new engine.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use chainseries::SeriesEngine;
    /// use chainseries_connectors::{BinanceConnector, CoinGeckoConnector, YahooConnector};
    ///
    /// let engine = SeriesEngine::builder()
    ///     .with_connector(YahooConnector::rate_limited().build())
    ///     .with_connector(CoinGeckoConnector::rate_limited().build())
    ///     .with_connector(BinanceConnector::new().build())
    ///     .cache_dir("data")
    ///     .build()?;
    /// let btc = engine.get_price_series(true, true).await;
    /// ```
    #[must_use]
    pub fn builder() -> SeriesEngineBuilder {
        SeriesEngineBuilder::new()
    }

    /// Engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Cache store backing this engine.
    #[must_use]
    pub const fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Current UTC day, or the day pinned on the builder.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Wrap a provider future with a timeout and standardized timeout error mapping.
    #[tracing::instrument(
        name = "chainseries::core::provider_call_with_timeout",
        level = "debug",
        skip(fut),
        fields(
            connector = connector_name,
            capability = %capability,
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        ),
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: Capability,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, SeriesError>
    where
        Fut: core::future::Future<Output = Result<T, SeriesError>>,
    {
        (tokio::time::timeout(timeout, fut).await).unwrap_or_else(|_| {
            Err(SeriesError::provider_timeout(
                connector_name,
                capability.as_str(),
            ))
        })
    }

    /// Connectors that claim `metric`, ordered by the priority list for
    /// `(metric, capability)` and then by registration order.
    pub(crate) fn ordered_for(
        &self,
        metric: Metric,
        capability: Capability,
    ) -> Vec<Arc<dyn SeriesConnector>> {
        let mut out: Vec<(usize, Arc<dyn SeriesConnector>)> = self
            .connectors
            .iter()
            .filter(|c| c.supports_metric(metric))
            .cloned()
            .enumerate()
            .collect();
        if let Some(pref) = self.priorities.get(&(metric, capability)) {
            let pos: HashMap<_, _> = pref
                .iter()
                .enumerate()
                .map(|(i, k)| (k.as_str(), i))
                .collect();
            out.sort_by_key(|(orig_i, c)| {
                (pos.get(c.name()).copied().unwrap_or(usize::MAX), *orig_i)
            });
        }
        out.into_iter().map(|(_, c)| c).collect()
    }
}
