use chainseries_core::{
    Attribution, DataSource, Dataset, Gap, Metric, NaiveDate, SeriesError, Span, TimeSeries,
    detect_gaps_as_of, overlay, validate_range,
};

use crate::SeriesEngine;
use crate::core::with_request_deadline;
use crate::pipeline::chain::SeriesRequest;

impl SeriesEngine {
    /// Observations of `metric` within `[start, end]`.
    ///
    /// An empty series means no data was available; it is never an error.
    pub async fn fetch_metric(&self, metric: Metric, start: NaiveDate, end: NaiveDate) -> TimeSeries {
        self.fetch_metric_dataset(metric, start, end)
            .await
            .map_or_else(|| TimeSeries::empty(metric), |d| d.series)
    }

    /// Fetch several metrics concurrently over the same range.
    ///
    /// Each metric uses its own cache file, so the calls do not interact.
    pub async fn fetch_metrics(
        &self,
        metrics: &[Metric],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<(Metric, TimeSeries)> {
        let tasks = metrics.iter().map(|&m| async move {
            let series = self.fetch_metric(m, start, end).await;
            (m, series)
        });
        futures::future::join_all(tasks).await
    }

    /// Like [`SeriesEngine::fetch_metric`], with provenance.
    ///
    /// - A fresh cache answers without upstream calls.
    /// - Otherwise range providers are tried in priority order; the answer
    ///   is laid over the cached series and persisted.
    /// - If every provider fails, a stale cache is used.
    ///
    /// [`Dataset::unfilled_gaps`] lists the holes inside `[start, end]`;
    /// nothing is filled here.
    ///
    /// Returns `None` for a reversed range or when nothing is available.
    #[tracing::instrument(
        name = "chainseries::metric::fetch_metric",
        skip(self),
        fields(metric = %metric, start = %start, end = %end),
    )]
    pub async fn fetch_metric_dataset(
        &self,
        metric: Metric,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Option<Dataset> {
        if let Err(e) = validate_range(start, end) {
            tracing::warn!(reason = e.reason(), error = %e, "rejected metric request");
            return None;
        }
        let run = self.run_metric(metric, start, end);
        match with_request_deadline(self.cfg.request_timeout, "metric", run).await {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!(reason = e.reason(), error = %e, "metric fetch exceeded deadline");
                self.cache
                    .read(metric)
                    .map(|cached| self.cached_dataset(&cached, start, end, vec![e]))
            }
        }
    }

    async fn run_metric(&self, metric: Metric, start: NaiveDate, end: NaiveDate) -> Option<Dataset> {
        let cached = self.cache.read(metric);
        if let Some(series) = &cached
            && self.cache.is_fresh(metric, self.cfg.cache_validity)
        {
            tracing::debug!(points = series.len(), "serving fresh cache");
            return Some(self.cached_dataset(series, start, end, vec![]));
        }

        match self.first_series(metric, SeriesRequest::Range { start, end }).await {
            Ok(hit) => {
                let merged = match &cached {
                    Some(base) => overlay(base, [hit.value.clone()]),
                    None => hit.value.clone(),
                };
                self.cache.write(&merged);

                let mut attribution = Attribution::new(metric);
                if let (Some(first), Some(last)) = (hit.value.first(), hit.value.last()) {
                    attribution.push((
                        hit.connector,
                        Span {
                            start: first.date(),
                            end: last.date(),
                        },
                    ));
                }
                let series = merged.between(start, end);
                Some(Dataset {
                    unfilled_gaps: self.gaps_until(&series, end),
                    series,
                    source: DataSource::Live,
                    attribution,
                    warnings: hit.errors,
                })
            }
            Err(e) => {
                tracing::warn!(reason = e.reason(), error = %e, "all providers failed");
                match cached {
                    Some(stale) => {
                        tracing::info!(
                            age_hours = self.cache.age_hours(metric),
                            "falling back to stale cache"
                        );
                        Some(self.cached_dataset(&stale, start, end, vec![e]))
                    }
                    None => None,
                }
            }
        }
    }

    fn cached_dataset(
        &self,
        series: &TimeSeries,
        start: NaiveDate,
        end: NaiveDate,
        warnings: Vec<SeriesError>,
    ) -> Dataset {
        let clipped = series.between(start, end);
        Dataset {
            unfilled_gaps: self.gaps_until(&clipped, end),
            attribution: Attribution::new(clipped.metric()),
            series: clipped,
            source: DataSource::Cached,
            warnings,
        }
    }

    /// Gaps in a series clipped to end at `end`, judged as if `end` were yesterday.
    fn gaps_until(&self, series: &TimeSeries, end: NaiveDate) -> Vec<Gap> {
        let as_of = end.succ_opt().unwrap_or(end).min(self.today());
        detect_gaps_as_of(series, self.gap_tolerance(series.metric()), as_of)
    }
}
