use std::sync::Arc;
use std::time::Duration;

use chainseries_core::connector::SeriesConnector;
use chainseries_middleware::ConnectorBuilder;
use chainseries_types::{BlacklistConfig, ThrottleConfig};

use crate::http::HttpSource;
use crate::{
    BinanceConnector, BlockchainComConnector, CoinGeckoConnector, CryptoDataDownloadConnector,
    GlassnodeConnector, MempoolConnector, YahooConnector,
};

/// Spacing applied by `rate_limited()` to keyless public APIs.
const PUBLIC_MIN_INTERVAL: Duration = Duration::from_secs(2);

macro_rules! keyless_constructors {
    ($ty:ident) => {
        impl $ty {
            /// Returns an unconfigured builder around the production connector.
            ///
            /// Customize with the builder methods before calling `.build()`.
            #[must_use]
            pub fn new() -> ConnectorBuilder {
                let raw: Arc<dyn SeriesConnector> = Arc::new(Self::new_raw());
                ConnectorBuilder::new(raw)
            }

            /// Returns a builder with light throttling and a blacklist on HTTP 429.
            #[must_use]
            pub fn rate_limited() -> ConnectorBuilder {
                Self::new()
                    .with_throttle(ThrottleConfig {
                        min_interval: PUBLIC_MIN_INTERVAL,
                    })
                    .with_blacklist(BlacklistConfig::default())
            }

            /// Expert-only: construct an unwrapped connector for manual composition.
            #[must_use]
            pub fn new_raw() -> Self {
                Self {
                    http: HttpSource::unchecked(
                        Self::KEY.as_str(),
                        Self::DEFAULT_BASE_URL,
                        Self::TIMEOUT,
                    ),
                }
            }
        }
    };
}

macro_rules! transport_settings {
    ($($ty:ident),+ $(,)?) => {$(
        impl $ty {
            /// Replace the per-request HTTP timeout (default [`Self::TIMEOUT`]).
            ///
            /// A request that runs past it fails with `ProviderTimeout`.
            #[must_use]
            pub fn with_timeout(mut self, timeout: Duration) -> Self {
                self.http.set_timeout(timeout);
                self
            }

            /// Current per-request HTTP timeout.
            #[must_use]
            pub const fn timeout(&self) -> Duration {
                self.http.timeout()
            }
        }
    )+};
}

transport_settings!(
    CoinGeckoConnector,
    YahooConnector,
    BinanceConnector,
    CryptoDataDownloadConnector,
    MempoolConnector,
    BlockchainComConnector,
    GlassnodeConnector,
);

keyless_constructors!(CoinGeckoConnector);
keyless_constructors!(YahooConnector);
keyless_constructors!(BinanceConnector);
keyless_constructors!(CryptoDataDownloadConnector);
keyless_constructors!(MempoolConnector);
keyless_constructors!(BlockchainComConnector);

impl GlassnodeConnector {
    /// Returns an unconfigured builder around a connector keyed from the environment.
    #[must_use]
    pub fn new() -> ConnectorBuilder {
        let raw: Arc<dyn SeriesConnector> = Arc::new(Self::new_raw());
        ConnectorBuilder::new(raw)
    }

    /// Returns a builder that waits 7 seconds between requests and blacklists on HTTP 429.
    #[must_use]
    pub fn rate_limited() -> ConnectorBuilder {
        Self::new()
            .with_throttle(ThrottleConfig::default())
            .with_blacklist(BlacklistConfig::default())
    }

    /// Expert-only: unwrapped connector keyed from `GLASSNODE_API_KEY`.
    #[must_use]
    pub fn new_raw() -> Self {
        Self::new_raw_with_key(Self::api_key_from_env())
    }

    /// Expert-only: unwrapped connector with an explicit key.
    #[must_use]
    pub fn new_raw_with_key(api_key: Option<String>) -> Self {
        Self {
            http: HttpSource::unchecked(Self::KEY.as_str(), Self::DEFAULT_BASE_URL, Self::TIMEOUT),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }
}
