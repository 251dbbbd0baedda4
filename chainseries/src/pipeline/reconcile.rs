//! Bootstrap, gap filling, and live splicing.

use chainseries_core::{
    Attribution, Gap, Metric, SeriesError, Span, SpliceOutcome, TimeSeries, detect_gaps_as_of,
    overlay, splice_live,
};

use crate::SeriesEngine;
use crate::pipeline::chain::SeriesRequest;

/// Result of a reconciliation step.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    /// Series after the step.
    pub series: TimeSeries,
    /// Spans contributed by connectors during the step.
    pub attribution: Attribution,
    /// Failures that were tolerated.
    pub warnings: Vec<SeriesError>,
}

impl Reconciled {
    fn unchanged(series: &TimeSeries) -> Self {
        Self {
            series: series.clone(),
            attribution: Attribution::new(series.metric()),
            warnings: vec![],
        }
    }
}

fn span_of(series: &TimeSeries) -> Option<Span> {
    Some(Span {
        start: series.first()?.date(),
        end: series.last()?.date(),
    })
}

impl SeriesEngine {
    /// Gaps in `series` relative to [`SeriesEngine::today`].
    ///
    /// The tolerance is the configured one, widened to the metric's
    /// [`Metric::min_gap_tolerance_days`].
    #[must_use]
    pub fn detect_gaps(&self, series: &TimeSeries) -> Vec<Gap> {
        detect_gaps_as_of(series, self.gap_tolerance(series.metric()), self.today())
    }

    pub(crate) const fn gap_tolerance(&self, metric: Metric) -> i64 {
        let floor = metric.min_gap_tolerance_days();
        if self.cfg.gap_tolerance_days > floor {
            self.cfg.gap_tolerance_days
        } else {
            floor
        }
    }

    /// Build an initial series for `metric` when the cache has nothing.
    ///
    /// Full-history providers are tried first. If none answers, range
    /// providers are asked for `[bootstrap_start, today]`.
    ///
    /// # Errors
    /// Returns the collapsed provider failure when no provider has data.
    #[tracing::instrument(name = "chainseries::reconcile::bootstrap", skip(self), fields(metric = %metric))]
    pub async fn bootstrap(&self, metric: Metric) -> Result<Reconciled, SeriesError> {
        let mut warnings = Vec::new();
        let requests = [
            SeriesRequest::FullHistory,
            SeriesRequest::Range {
                start: self.cfg.bootstrap_start,
                end: self.today(),
            },
        ];
        let mut last_err = SeriesError::not_found(format!("{metric} history"));
        for request in requests {
            match self.first_series(metric, request).await {
                Ok(hit) => {
                    warnings.extend(hit.errors);
                    let mut attribution = Attribution::new(metric);
                    if let Some(span) = span_of(&hit.value) {
                        attribution.push((hit.connector, span));
                    }
                    tracing::info!(
                        connector = hit.connector,
                        points = hit.value.len(),
                        "bootstrapped series"
                    );
                    return Ok(Reconciled {
                        series: hit.value,
                        attribution,
                        warnings,
                    });
                }
                // Nobody offers this capability; not worth reporting.
                Err(SeriesError::Unsupported { .. }) => {}
                Err(e) => {
                    warnings.push(e.clone());
                    last_err = e;
                }
            }
        }
        tracing::error!(reason = last_err.reason(), error = %last_err, "bootstrap failed");
        Err(if warnings.len() > 1 {
            SeriesError::AllProvidersFailed(warnings)
        } else {
            last_err
        })
    }

    /// Fill `gaps` in `series` from range providers in priority order.
    ///
    /// Gaps are processed chronologically. For each gap the first provider
    /// returning data inside it wins; a gap nobody can fill is logged and
    /// left open. Fetched points override existing points on the same
    /// timestamp. With no gaps this is a no-op.
    #[tracing::instrument(
        name = "chainseries::reconcile::fill_gaps",
        skip(self, series, gaps),
        fields(metric = %series.metric(), gaps = gaps.len()),
    )]
    pub async fn fill_gaps(&self, series: &TimeSeries, gaps: &[Gap]) -> Reconciled {
        if gaps.is_empty() {
            return Reconciled::unchanged(series);
        }
        let metric = series.metric();
        let mut ordered = gaps.to_vec();
        ordered.sort_by_key(|g| g.start);

        let mut fills: Vec<TimeSeries> = Vec::new();
        let mut attribution = Attribution::new(metric);
        let mut warnings = Vec::new();

        for gap in ordered {
            let request = SeriesRequest::Range {
                start: gap.start,
                end: gap.end,
            };
            match self.first_series(metric, request).await {
                Ok(hit) => {
                    warnings.extend(hit.errors);
                    // providers may answer with more than was asked for
                    let clipped = hit.value.between(gap.start, gap.end);
                    if let Some(span) = span_of(&clipped) {
                        tracing::info!(
                            connector = hit.connector,
                            start = %gap.start,
                            end = %gap.end,
                            points = clipped.len(),
                            "gap filled"
                        );
                        attribution.push((hit.connector, span));
                        fills.push(clipped);
                    } else {
                        tracing::warn!(
                            connector = hit.connector,
                            start = %gap.start,
                            end = %gap.end,
                            "provider data fell outside the gap"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        start = %gap.start,
                        end = %gap.end,
                        reason = e.reason(),
                        error = %e,
                        "gap left unfilled"
                    );
                    warnings.push(e);
                }
            }
        }

        Reconciled {
            series: overlay(series, fills),
            attribution,
            warnings,
        }
    }

    /// Splice the first available live tick into `series` as today's point.
    ///
    /// A live failure leaves the series untouched and is returned as a warning.
    #[tracing::instrument(
        name = "chainseries::reconcile::splice_live",
        skip(self, series),
        fields(metric = %series.metric()),
    )]
    pub async fn splice_live(&self, series: &TimeSeries) -> Reconciled {
        let metric = series.metric();
        match self.first_live(metric).await {
            Ok(hit) => {
                let today = self.today();
                let (spliced, outcome) = splice_live(series, hit.value, today);
                tracing::info!(
                    connector = hit.connector,
                    value = hit.value.value,
                    replaced = outcome == SpliceOutcome::Replaced,
                    "live tick spliced"
                );
                let mut attribution = Attribution::new(metric);
                attribution.push((
                    hit.connector,
                    Span {
                        start: today,
                        end: today,
                    },
                ));
                Reconciled {
                    series: spliced,
                    attribution,
                    warnings: hit.errors,
                }
            }
            Err(e) => {
                tracing::warn!(reason = e.reason(), error = %e, "live splice skipped");
                Reconciled {
                    warnings: vec![e],
                    ..Reconciled::unchanged(series)
                }
            }
        }
    }
}
