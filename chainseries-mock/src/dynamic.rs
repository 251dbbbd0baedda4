use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use chainseries_core::connector::{
    FullHistoryProvider, LiveProvider, RangeProvider, SeriesConnector,
};
use chainseries_core::{Capability, LivePoint, Metric, NaiveDate, SeriesError, TimeSeries};

/// Instruction for how a method should behave for a given metric.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(SeriesError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

/// One recorded call against a dynamic mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockCall {
    /// Capability that was invoked.
    pub capability: Capability,
    /// Requested metric.
    pub metric: Metric,
    /// Requested range for range calls.
    pub range: Option<(NaiveDate, NaiveDate)>,
}

#[derive(Default)]
struct InternalState {
    range_rules: HashMap<Metric, MockBehavior<TimeSeries>>,
    full_history_rules: HashMap<Metric, MockBehavior<TimeSeries>>,
    live_rules: HashMap<Metric, MockBehavior<LivePoint>>,
    calls: Vec<MockCall>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `fetch_range` calls for a metric.
    ///
    /// A returned series is clipped to the requested range.
    pub async fn set_range_behavior(&self, metric: Metric, behavior: MockBehavior<TimeSeries>) {
        let mut guard = self.state.lock().await;
        guard.range_rules.insert(metric, behavior);
    }

    /// Set the behavior for `fetch_full_history` calls for a metric.
    pub async fn set_full_history_behavior(
        &self,
        metric: Metric,
        behavior: MockBehavior<TimeSeries>,
    ) {
        let mut guard = self.state.lock().await;
        guard.full_history_rules.insert(metric, behavior);
    }

    /// Set the behavior for `fetch_live` calls for a metric.
    pub async fn set_live_behavior(&self, metric: Metric, behavior: MockBehavior<LivePoint>) {
        let mut guard = self.state.lock().await;
        guard.live_rules.insert(metric, behavior);
    }

    /// Return a copy of the call log.
    pub async fn calls(&self) -> Vec<MockCall> {
        self.state.lock().await.calls.clone()
    }

    /// Number of logged calls for one capability.
    pub async fn call_count(&self, capability: Capability) -> usize {
        let guard = self.state.lock().await;
        guard
            .calls
            .iter()
            .filter(|c| c.capability == capability)
            .count()
    }

    /// Clear all configured behaviors and the call log.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.range_rules.clear();
        guard.full_history_rules.clear();
        guard.live_rules.clear();
        guard.calls.clear();
    }
}

/// A connector that defers all behavior to an external controller.
///
/// Calls for a metric without a configured rule fail with `Unsupported`.
pub struct DynamicMockConnector {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockConnector {
    /// Create a new dynamic mock connector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn SeriesConnector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn SeriesConnector>, controller)
    }

    async fn log(&self, call: MockCall) {
        self.state.lock().await.calls.push(call);
    }
}

async fn resolve<T>(behavior: Option<MockBehavior<T>>, capability: Capability) -> Result<T, SeriesError> {
    match behavior {
        Some(MockBehavior::Return(v)) => Ok(v),
        Some(MockBehavior::Fail(e)) => Err(e),
        Some(MockBehavior::Hang) => {
            std::future::pending::<()>().await;
            unreachable!()
        }
        None => Err(SeriesError::unsupported(capability.as_str())),
    }
}

impl SeriesConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn supports_metric(&self, _metric: Metric) -> bool {
        true
    }

    fn as_range_provider(&self) -> Option<&dyn RangeProvider> {
        Some(self as &dyn RangeProvider)
    }

    fn as_full_history_provider(&self) -> Option<&dyn FullHistoryProvider> {
        Some(self as &dyn FullHistoryProvider)
    }

    fn as_live_provider(&self) -> Option<&dyn LiveProvider> {
        Some(self as &dyn LiveProvider)
    }
}

#[async_trait]
impl RangeProvider for DynamicMockConnector {
    async fn fetch_range(
        &self,
        metric: Metric,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, SeriesError> {
        self.log(MockCall {
            capability: Capability::Range,
            metric,
            range: Some((start, end)),
        })
        .await;
        chainseries_core::validate_range(start, end)?;
        // Acquire behavior snapshot without holding the lock across await points
        let behavior = {
            let guard = self.state.lock().await;
            guard.range_rules.get(&metric).cloned()
        };
        resolve(behavior, Capability::Range)
            .await
            .map(|s| s.between(start, end))
    }
}

#[async_trait]
impl FullHistoryProvider for DynamicMockConnector {
    async fn fetch_full_history(&self, metric: Metric) -> Result<TimeSeries, SeriesError> {
        self.log(MockCall {
            capability: Capability::FullHistory,
            metric,
            range: None,
        })
        .await;
        let behavior = {
            let guard = self.state.lock().await;
            guard.full_history_rules.get(&metric).cloned()
        };
        resolve(behavior, Capability::FullHistory).await
    }
}

#[async_trait]
impl LiveProvider for DynamicMockConnector {
    async fn fetch_live(&self, metric: Metric) -> Result<LivePoint, SeriesError> {
        self.log(MockCall {
            capability: Capability::Live,
            metric,
            range: None,
        })
        .await;
        let behavior = {
            let guard = self.state.lock().await;
            guard.live_rules.get(&metric).cloned()
        };
        resolve(behavior, Capability::Live).await
    }
}
