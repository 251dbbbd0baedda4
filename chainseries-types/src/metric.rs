use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SeriesError;

/// Daily Bitcoin series the engine knows how to acquire and reconcile.
///
/// Each metric has a canonical value field name (the column written to the
/// cache) and a cache key (the file stem under the cache directory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Metric {
    /// BTC/USD daily close.
    Price,
    /// Network hash rate in EH/s.
    HashRate,
    /// Mining difficulty.
    Difficulty,
    /// Difficulty change at each adjustment, in percent.
    DifficultyAdjustment,
    /// Unique active addresses per day.
    ActiveAddresses,
    /// Confirmed transactions per day.
    TransactionCount,
    /// Miner revenue in USD.
    MinerRevenue,
    /// Market capitalization in USD.
    MarketCap,
    /// Estimated on-chain transaction volume in USD.
    TransactionVolume,
    /// Network value to transactions ratio.
    NvtRatio,
    /// Market value to realized value ratio.
    MvrvRatio,
    /// Spent output profit ratio.
    Sopr,
    /// Supply held by long-term holders, in BTC.
    LthSupply,
}

impl Metric {
    /// Every metric, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Price,
        Self::HashRate,
        Self::Difficulty,
        Self::DifficultyAdjustment,
        Self::ActiveAddresses,
        Self::TransactionCount,
        Self::MinerRevenue,
        Self::MarketCap,
        Self::TransactionVolume,
        Self::NvtRatio,
        Self::MvrvRatio,
        Self::Sopr,
        Self::LthSupply,
    ];

    /// Canonical value field name, also used as the cache column header.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::HashRate => "hash_rate_eh",
            Self::Difficulty => "difficulty",
            Self::DifficultyAdjustment => "adjustment_pct",
            Self::ActiveAddresses => "active_addresses",
            Self::TransactionCount => "tx_count",
            Self::MinerRevenue => "revenue_usd",
            Self::MarketCap => "market_cap",
            Self::TransactionVolume => "tx_volume",
            Self::NvtRatio => "nvt_ratio",
            Self::MvrvRatio => "mvrv_ratio",
            Self::Sopr => "sopr",
            Self::LthSupply => "lth_supply_btc",
        }
    }

    /// Relative cache file stem (without extension).
    #[must_use]
    pub fn cache_key(self) -> String {
        match self {
            Self::Price => "bitcoin_price_history".to_string(),
            other => format!("on_chain/{}_cache", other.field()),
        }
    }

    /// Smallest gap tolerance that suits the metric's publishing cadence.
    ///
    /// Difficulty only changes at retarget blocks, roughly every 14 days, so
    /// a missing observation shows up as more than one and a half epochs
    /// without a point. Daily metrics return 0 and defer to the configured
    /// tolerance.
    #[must_use]
    pub const fn min_gap_tolerance_days(self) -> i64 {
        match self {
            Self::Difficulty | Self::DifficultyAdjustment => 21,
            _ => 0,
        }
    }

    /// Whether the metric is an on-chain series rather than market price.
    #[must_use]
    pub const fn is_on_chain(self) -> bool {
        !matches!(self, Self::Price)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

impl FromStr for Metric {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.field() == wanted)
            .ok_or_else(|| SeriesError::InvalidArg(format!("unknown metric: {s}")))
    }
}
