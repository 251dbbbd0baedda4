//! chainseries-connectors
//!
//! HTTP source adapters implementing `SeriesConnector`.
//!
//! | Connector | Capabilities | Metrics |
//! |---|---|---|
//! | [`CoinGeckoConnector`] | range | price |
//! | [`YahooConnector`] | range, full history | price |
//! | [`CryptoDataDownloadConnector`] | full history | price |
//! | [`BinanceConnector`] | live | price |
//! | [`MempoolConnector`] | range | hash rate, difficulty, adjustments |
//! | [`BlockchainComConnector`] | range | activity charts, market cap, NVT |
//! | [`GlassnodeConnector`] | range | MVRV, SOPR, addresses, hash rate, LTH supply, NVT |
//!
//! Every connector exposes `new()` (builder), `rate_limited()` (builder with
//! throttling and rate-limit blacklisting), `new_raw()`, and `with_base_url()`
//! for pointing at a proxy or a mock server.
#![warn(missing_docs)]

mod builder;
mod http;

/// Binance live ticker.
pub mod binance;
/// Blockchain.com charts.
pub mod blockchain_com;
/// CoinGecko market chart.
pub mod coingecko;
/// CryptoDataDownload Bitstamp CSV.
pub mod cryptodatadownload;
/// Glassnode metrics.
pub mod glassnode;
/// mempool.space mining statistics.
pub mod mempool;
/// Yahoo Finance chart API.
pub mod yahoo;

use std::sync::Arc;

use chainseries_core::connector::SeriesConnector;

pub use binance::BinanceConnector;
pub use blockchain_com::BlockchainComConnector;
pub use coingecko::CoinGeckoConnector;
pub use cryptodatadownload::CryptoDataDownloadConnector;
pub use glassnode::GlassnodeConnector;
pub use mempool::MempoolConnector;
pub use yahoo::YahooConnector;

/// Every production connector, each wrapped by its `rate_limited()` stack.
///
/// Glassnode is included only when `GLASSNODE_API_KEY` is set.
#[must_use]
pub fn default_connectors() -> Vec<Arc<dyn SeriesConnector>> {
    let mut all = vec![
        CryptoDataDownloadConnector::rate_limited().build(),
        YahooConnector::rate_limited().build(),
        CoinGeckoConnector::rate_limited().build(),
        BinanceConnector::rate_limited().build(),
        MempoolConnector::rate_limited().build(),
        BlockchainComConnector::rate_limited().build(),
    ];
    if GlassnodeConnector::api_key_from_env().is_some() {
        all.push(GlassnodeConnector::rate_limited().build());
    }
    all
}
