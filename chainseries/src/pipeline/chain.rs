//! Priority-ordered provider chains: the first usable answer wins.

use chainseries_core::{Capability, LivePoint, Metric, NaiveDate, SeriesError, TimeSeries};

use crate::SeriesEngine;
use crate::core::tag_err;
use crate::pipeline::util::collapse_errors;

/// What to ask series providers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SeriesRequest {
    /// Inclusive range of days.
    Range { start: NaiveDate, end: NaiveDate },
    /// Everything the provider has.
    FullHistory,
}

impl SeriesRequest {
    pub(crate) const fn capability(self) -> Capability {
        match self {
            Self::Range { .. } => Capability::Range,
            Self::FullHistory => Capability::FullHistory,
        }
    }
}

/// A successful provider answer plus the failures seen before it.
pub(crate) struct ChainHit<T> {
    pub connector: &'static str,
    pub value: T,
    pub errors: Vec<SeriesError>,
}

impl SeriesEngine {
    /// Try series providers in priority order until one returns a non-empty series.
    ///
    /// Empty answers count as `NotFound` and move on to the next provider.
    #[tracing::instrument(
        name = "chainseries::chain::first_series",
        skip(self),
        fields(metric = %metric),
    )]
    pub(crate) async fn first_series(
        &self,
        metric: Metric,
        request: SeriesRequest,
    ) -> Result<ChainHit<TimeSeries>, SeriesError> {
        let capability = request.capability();
        let mut attempted_any = false;
        let mut errors: Vec<SeriesError> = Vec::new();

        for c in self.ordered_for(metric, capability) {
            let fut = match request {
                SeriesRequest::Range { start, end } => match c.as_range_provider() {
                    Some(p) => p.fetch_range(metric, start, end),
                    None => continue,
                },
                SeriesRequest::FullHistory => match c.as_full_history_provider() {
                    Some(p) => p.fetch_full_history(metric),
                    None => continue,
                },
            };
            attempted_any = true;
            match Self::provider_call_with_timeout(
                c.name(),
                capability,
                self.cfg.provider_timeout,
                fut,
            )
            .await
            {
                Ok(series) if !series.is_empty() => {
                    tracing::debug!(
                        connector = c.name(),
                        capability = %capability,
                        points = series.len(),
                        "provider answered"
                    );
                    return Ok(ChainHit {
                        connector: c.name(),
                        value: series,
                        errors,
                    });
                }
                Ok(_) => {
                    tracing::warn!(
                        connector = c.name(),
                        capability = %capability,
                        reason = "empty",
                        "provider returned no data"
                    );
                    errors.push(SeriesError::not_found(format!(
                        "{metric} {capability} from {}",
                        c.name()
                    )));
                }
                Err(e) => {
                    tracing::warn!(
                        connector = c.name(),
                        capability = %capability,
                        reason = e.reason(),
                        error = %e,
                        "provider failed"
                    );
                    errors.push(tag_err(c.name(), e));
                }
            }
        }

        Err(collapse_errors(
            capability,
            attempted_any,
            errors,
            Some(format!("{metric} {capability}")),
        ))
    }

    /// Try live providers in priority order until one returns a tick.
    #[tracing::instrument(
        name = "chainseries::chain::first_live",
        skip(self),
        fields(metric = %metric),
    )]
    pub(crate) async fn first_live(
        &self,
        metric: Metric,
    ) -> Result<ChainHit<LivePoint>, SeriesError> {
        let mut attempted_any = false;
        let mut errors: Vec<SeriesError> = Vec::new();

        for c in self.ordered_for(metric, Capability::Live) {
            let Some(p) = c.as_live_provider() else {
                continue;
            };
            attempted_any = true;
            match Self::provider_call_with_timeout(
                c.name(),
                Capability::Live,
                self.cfg.provider_timeout,
                p.fetch_live(metric),
            )
            .await
            {
                Ok(tick) => {
                    return Ok(ChainHit {
                        connector: c.name(),
                        value: tick,
                        errors,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        connector = c.name(),
                        reason = e.reason(),
                        error = %e,
                        "live provider failed"
                    );
                    errors.push(tag_err(c.name(), e));
                }
            }
        }

        Err(collapse_errors(Capability::Live, attempted_any, errors, None))
    }
}
