//! Configuration types shared across the orchestrator and connectors.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Minimum spacing between consecutive upstream requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Minimum delay between the start of two requests.
    pub min_interval: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_secs(7),
        }
    }
}

/// How long a connector is taken out of rotation after the upstream rate-limits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistConfig {
    /// Blacklist duration applied after an HTTP 429 response.
    pub duration: Duration,
}

impl Default for BlacklistConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(5 * 60),
        }
    }
}

/// Global configuration for the `SeriesEngine` orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding one CSV file per metric.
    pub cache_dir: PathBuf,
    /// Age after which a cache file is considered stale.
    pub cache_validity: Duration,
    /// Consecutive points further apart than this many days delimit a gap.
    pub gap_tolerance_days: i64,
    /// Timeout for individual provider requests.
    pub provider_timeout: Duration,
    /// Optional overall deadline for one orchestration call.
    pub request_timeout: Option<Duration>,
    /// Earliest day requested when bootstrapping a price history.
    pub bootstrap_start: NaiveDate,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("data"),
            cache_validity: Duration::from_secs(24 * 60 * 60),
            gap_tolerance_days: 1,
            provider_timeout: Duration::from_secs(30),
            request_timeout: None,
            bootstrap_start: NaiveDate::from_ymd_opt(2014, 9, 17).unwrap_or(NaiveDate::MIN),
        }
    }
}
