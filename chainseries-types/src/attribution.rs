//! Attribution types for reconciled series spans.

use chrono::NaiveDate;

/// A continuous span of calendar days [start..=end] that a connector contributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Inclusive first day.
    pub start: NaiveDate,
    /// Inclusive last day.
    pub end: NaiveDate,
}

/// Attribution of a reconciled series: which connector supplied which spans.
///
/// Behavior:
/// - Built while bootstrapping, filling gaps, and splicing the live tick.
/// - Spans from the cache are not recorded; anything not covered here came
///   from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    /// Metric the attribution refers to.
    pub metric: crate::Metric,
    /// Collected spans annotated by connector name.
    pub spans: Vec<(&'static str, Span)>, // (connector_name, span)
}

impl Attribution {
    /// Create a new attribution container for a metric.
    #[must_use]
    pub const fn new(metric: crate::Metric) -> Self {
        Self {
            metric,
            spans: vec![],
        }
    }

    /// Record a provider span contribution.
    pub fn push(&mut self, item: (&'static str, Span)) {
        self.spans.push(item);
    }

    /// Whether any connector contributed data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}
