//! On-disk cache: one CSV file per metric.
//!
//! Files hold a `date` column and the metric's canonical value column. The
//! file modification time is the only freshness signal. Every write replaces
//! the whole file through a temporary file in the same directory, so readers
//! never observe a partially written table. Concurrent writers for the same
//! metric are not coordinated; the last rename wins.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chainseries_core::{DateTime, Metric, NaiveDate, Point, SeriesError, TimeSeries, Utc};
use chrono::NaiveDateTime;
use tempfile::NamedTempFile;

const DATE_COLUMN: &str = "date";
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A cached series together with the time it was last written.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Relative file stem of the entry, see [`Metric::cache_key`].
    pub metric_key: String,
    /// The cached series.
    pub series: TimeSeries,
    /// Modification time of the backing file.
    pub last_written_at: DateTime<Utc>,
}

/// Per-metric CSV tables under a cache directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory of the store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the CSV file backing `metric`.
    #[must_use]
    pub fn path_for(&self, metric: Metric) -> PathBuf {
        self.dir.join(format!("{}.csv", metric.cache_key()))
    }

    /// Read the cached series for `metric`.
    ///
    /// Returns `None` when the file is missing, empty, or cannot be parsed.
    /// Never fails.
    #[must_use]
    pub fn read(&self, metric: Metric) -> Option<TimeSeries> {
        match self.try_read(metric) {
            Ok(Some(series)) if !series.is_empty() => Some(series),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(
                    metric = %metric,
                    path = %self.path_for(metric).display(),
                    reason = e.reason(),
                    error = %e,
                    "ignoring unreadable cache file"
                );
                None
            }
        }
    }

    /// Read the cached series along with its modification time.
    #[must_use]
    pub fn read_entry(&self, metric: Metric) -> Option<CacheEntry> {
        let last_written_at = self.last_written_at(metric)?;
        let series = self.read(metric)?;
        Some(CacheEntry {
            metric_key: metric.cache_key(),
            series,
            last_written_at,
        })
    }

    /// Persist `series` as the whole cache table of its metric.
    ///
    /// Creates the cache directory on demand. Failures are logged and reported
    /// as `false`; the caller keeps working with its in-memory series.
    pub fn write(&self, series: &TimeSeries) -> bool {
        match self.try_write(series) {
            Ok(path) => {
                tracing::debug!(
                    metric = %series.metric(),
                    rows = series.len(),
                    path = %path.display(),
                    "cache written"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    metric = %series.metric(),
                    reason = e.reason(),
                    error = %e,
                    "cache write failed"
                );
                false
            }
        }
    }

    /// Whether the cache file for `metric` was written within `validity`.
    ///
    /// A missing file is never fresh.
    #[must_use]
    pub fn is_fresh(&self, metric: Metric, validity: Duration) -> bool {
        self.age(metric).is_some_and(|age| age <= validity)
    }

    /// Age of the cache file in hours, or `-1.0` when it does not exist.
    #[must_use]
    pub fn age_hours(&self, metric: Metric) -> f64 {
        self.age(metric)
            .map_or(-1.0, |age| age.as_secs_f64() / 3600.0)
    }

    /// Modification time of the cache file, if it exists.
    #[must_use]
    pub fn last_written_at(&self, metric: Metric) -> Option<DateTime<Utc>> {
        self.modified(metric).map(DateTime::<Utc>::from)
    }

    fn modified(&self, metric: Metric) -> Option<SystemTime> {
        std::fs::metadata(self.path_for(metric))
            .and_then(|m| m.modified())
            .ok()
    }

    fn age(&self, metric: Metric) -> Option<Duration> {
        // an mtime in the future counts as just written
        self.modified(metric)
            .map(|t| t.elapsed().unwrap_or(Duration::ZERO))
    }

    fn try_read(&self, metric: Metric) -> Result<Option<TimeSeries>, SeriesError> {
        let path = self.path_for(metric);
        if !path.exists() {
            return Ok(None);
        }
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(false)
            .from_path(&path)
            .map_err(cache_err)?;
        let headers = rdr.headers().map_err(cache_err)?.clone();
        if headers.is_empty() {
            return Ok(None);
        }
        let date_idx = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(DATE_COLUMN))
            .unwrap_or(0);
        let value_idx = headers
            .iter()
            .position(|h| h.trim() == metric.field())
            .or_else(|| (0..headers.len()).find(|&i| i != date_idx))
            .ok_or_else(|| SeriesError::Cache(format!("no value column in {}", path.display())))?;

        let mut points = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(cache_err)?;
            let raw_ts = record.get(date_idx).unwrap_or_default();
            let raw_value = record.get(value_idx).unwrap_or_default();
            let ts = parse_timestamp(raw_ts)
                .ok_or_else(|| SeriesError::Cache(format!("bad timestamp: {raw_ts:?}")))?;
            let value: f64 = raw_value
                .trim()
                .parse()
                .map_err(|_| SeriesError::Cache(format!("bad value: {raw_value:?}")))?;
            points.push(Point { ts, value });
        }
        Ok(Some(TimeSeries::new(metric, points)))
    }

    fn try_write(&self, series: &TimeSeries) -> Result<PathBuf, SeriesError> {
        let path = self.path_for(series.metric());
        let parent = path
            .parent()
            .map_or_else(|| self.dir.clone(), Path::to_path_buf);
        std::fs::create_dir_all(&parent).map_err(cache_err)?;

        let mut tmp = NamedTempFile::new_in(&parent).map_err(cache_err)?;
        {
            let mut wtr = csv::Writer::from_writer(tmp.as_file_mut());
            wtr.write_record([DATE_COLUMN, series.metric().field()])
                .map_err(cache_err)?;
            for p in series.points() {
                wtr.write_record([format_timestamp(p.ts), p.value.to_string()])
                    .map_err(cache_err)?;
            }
            wtr.flush().map_err(cache_err)?;
        }
        tmp.as_file_mut().flush().map_err(cache_err)?;
        tmp.persist(&path).map_err(|e| cache_err(e.error))?;
        Ok(path)
    }
}

fn cache_err(e: impl std::fmt::Display) -> SeriesError {
    SeriesError::Cache(e.to_string())
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    if ts.time() == chrono::NaiveTime::MIN {
        ts.format(DATE_FORMAT).to_string()
    } else {
        ts.format(DATETIME_FORMAT).to_string()
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(Point::daily(d, 0.0).ts);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT) {
        return Some(dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
