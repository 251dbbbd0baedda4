// Shared fixtures for engine tests.
#![allow(dead_code)]

use std::sync::Arc;

use chainseries::{SeriesEngine, SeriesEngineBuilder};
use chainseries_core::{LivePoint, Metric, NaiveDate, SeriesConnector, TimeSeries};
use chainseries_mock::{DynamicMockConnector, DynamicMockController};
use tempfile::TempDir;

/// Calendar day shorthand.
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

/// `n` consecutive daily points starting at `start`, valued `base + i`.
pub fn run(metric: Metric, start: NaiveDate, n: u64, base: f64) -> TimeSeries {
    TimeSeries::from_daily(
        metric,
        (0..n).map(|i| (start + chrono::Days::new(i), base + i as f64)),
    )
}

/// Live tick stamped at noon of `day`.
pub fn tick(day: NaiveDate, value: f64) -> LivePoint {
    LivePoint {
        ts: day.and_hms_opt(12, 0, 0).expect("valid time").and_utc(),
        value,
    }
}

/// A scripted connector and its controller.
pub fn dynamic(name: &'static str) -> (Arc<dyn SeriesConnector>, DynamicMockController) {
    DynamicMockConnector::new_with_controller(name)
}

/// Builder rooted at a fresh temporary cache directory pinned to `today`.
pub fn builder(dir: &TempDir, today: NaiveDate) -> SeriesEngineBuilder {
    SeriesEngine::builder()
        .cache_dir(dir.path())
        .today(today)
        .provider_timeout(std::time::Duration::from_millis(200))
}

pub fn tempdir() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}

/// Age a cache file by `hours` so it reads as stale.
pub fn age_file(path: &std::path::Path, hours: u64) {
    let when = std::time::SystemTime::now() - std::time::Duration::from_secs(hours * 3600);
    filetime::set_file_mtime(path, filetime::FileTime::from_system_time(when)).expect("set mtime");
}
