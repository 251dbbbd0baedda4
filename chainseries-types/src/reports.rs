//! Result envelopes produced by the orchestrator.

use serde::{Deserialize, Serialize};

use crate::{Attribution, Gap, SeriesError, TimeSeries};

/// Where the data in a [`Dataset`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DataSource {
    /// At least one upstream contributed during this call.
    Live,
    /// Served entirely from the on-disk cache.
    Cached,
    /// Placeholder data registered by the caller; not real observations.
    SampleFallback,
}

impl DataSource {
    /// Stable identifier for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Cached => "cached",
            Self::SampleFallback => "sample-fallback",
        }
    }
}

/// A reconciled series plus provenance.
///
/// Carries the series, where it came from, which connectors contributed which
/// spans, gaps that could not be filled, and any non-fatal failures
/// encountered along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Sorted, de-duplicated series.
    pub series: TimeSeries,
    /// Provenance of the data.
    pub source: DataSource,
    /// Connector spans contributed during this call.
    pub attribution: Attribution,
    /// Gaps that remained after filling.
    pub unfilled_gaps: Vec<Gap>,
    /// Non-fatal issues encountered while building the dataset.
    pub warnings: Vec<SeriesError>,
}

impl Dataset {
    /// Convenience: true when the data is a real observation set (not a placeholder).
    #[must_use]
    pub const fn is_real(&self) -> bool {
        !matches!(self.source, DataSource::SampleFallback)
    }
}
