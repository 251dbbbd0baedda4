use chainseries_core::{Attribution, DataSource, Dataset, Metric, SeriesError, TimeSeries};

use crate::SeriesEngine;
use crate::core::with_request_deadline;

impl SeriesEngine {
    /// Return the consolidated daily series for `metric`.
    ///
    /// Steps:
    /// - Read the cache. A fresh, gap-free cache answers immediately when no
    ///   live tick is wanted.
    /// - Without a cached series, bootstrap from upstream. If that fails too,
    ///   the result is `None` (or the registered sample fallback).
    /// - With `auto_fill_gaps`, detect and fill gaps from range providers.
    /// - With `include_live`, splice the latest tick in as today's point.
    /// - Persist when any upstream contributed; a failed write is only logged.
    ///
    /// Every upstream failure degrades gracefully and is reported in
    /// [`Dataset::warnings`]. A stale cache is still returned when refreshing
    /// it fails.
    #[tracing::instrument(name = "chainseries::series::get_series", skip(self), fields(metric = %metric))]
    pub async fn get_series(
        &self,
        metric: Metric,
        include_live: bool,
        auto_fill_gaps: bool,
    ) -> Option<Dataset> {
        let run = self.run_series(metric, include_live, auto_fill_gaps);
        let out = match with_request_deadline(self.cfg.request_timeout, "series", run).await {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!(reason = e.reason(), error = %e, "series refresh exceeded deadline");
                self.cache.read(metric).map(|series| Dataset {
                    unfilled_gaps: self.detect_gaps(&series),
                    series,
                    source: DataSource::Cached,
                    attribution: Attribution::new(metric),
                    warnings: vec![e],
                })
            }
        };
        out.or_else(|| self.sample_dataset(metric))
    }

    /// Shorthand for [`SeriesEngine::get_series`] on [`Metric::Price`].
    pub async fn get_price_series(&self, include_live: bool, auto_fill_gaps: bool) -> Option<Dataset> {
        self.get_series(Metric::Price, include_live, auto_fill_gaps)
            .await
    }

    /// Like [`SeriesEngine::get_series`] with live splicing and gap filling,
    /// but reports absence as an error.
    ///
    /// # Errors
    /// Returns `NotFound` when no data exists anywhere for `metric`.
    pub async fn refresh(&self, metric: Metric) -> Result<Dataset, SeriesError> {
        self.get_series(metric, true, true)
            .await
            .ok_or_else(|| SeriesError::not_found(format!("{metric} series")))
    }

    async fn run_series(
        &self,
        metric: Metric,
        include_live: bool,
        auto_fill_gaps: bool,
    ) -> Option<Dataset> {
        let cached = self.cache.read(metric);
        let mut warnings: Vec<SeriesError> = Vec::new();
        let mut attribution = Attribution::new(metric);

        let base = if let Some(series) = cached {
            let fresh = self.cache.is_fresh(metric, self.cfg.cache_validity);
            let gaps = self.detect_gaps(&series);
            if fresh && !include_live && (gaps.is_empty() || !auto_fill_gaps) {
                tracing::debug!(points = series.len(), "serving fresh cache");
                return Some(Dataset {
                    series,
                    source: DataSource::Cached,
                    attribution,
                    unfilled_gaps: gaps,
                    warnings,
                });
            }
            tracing::debug!(
                points = series.len(),
                fresh,
                gaps = gaps.len(),
                age_hours = self.cache.age_hours(metric),
                "refreshing cached series"
            );
            series
        } else {
            match self.bootstrap(metric).await {
                Ok(r) => {
                    warnings.extend(r.warnings);
                    attribution.spans.extend(r.attribution.spans);
                    r.series
                }
                Err(e) => {
                    tracing::error!(reason = e.reason(), error = %e, "no data available");
                    return None;
                }
            }
        };

        let mut series = base;
        if auto_fill_gaps {
            let gaps = self.detect_gaps(&series);
            let r = self.fill_gaps(&series, &gaps).await;
            warnings.extend(r.warnings);
            attribution.spans.extend(r.attribution.spans);
            series = r.series;
        }
        if include_live {
            let r = self.splice_live(&series).await;
            warnings.extend(r.warnings);
            attribution.spans.extend(r.attribution.spans);
            series = r.series;
        }

        let source = if attribution.is_empty() {
            DataSource::Cached
        } else {
            self.cache.write(&series);
            DataSource::Live
        };
        Some(Dataset {
            unfilled_gaps: self.detect_gaps(&series),
            series,
            source,
            attribution,
            warnings,
        })
    }

    pub(crate) fn sample_dataset(&self, metric: Metric) -> Option<Dataset> {
        let series: &TimeSeries = self.samples.get(&metric)?;
        tracing::warn!(metric = %metric, points = series.len(), "serving sample fallback");
        Some(Dataset {
            series: series.clone(),
            source: DataSource::SampleFallback,
            attribution: Attribution::new(metric),
            unfilled_gaps: vec![],
            warnings: vec![SeriesError::not_found(format!("{metric} series"))],
        })
    }
}
