use std::sync::Arc;

use crate::connector::SeriesConnector;
use crate::types::MiddlewareLayer;

/// A wrapper that can be layered around any connector.
///
/// Wrapped connectors keep the inner connector's name and role accessors, so
/// priority lists written against raw keys still match.
pub trait Middleware: Send + Sync {
    /// Wrap `inner`.
    fn apply(self: Box<Self>, inner: Arc<dyn SeriesConnector>) -> Arc<dyn SeriesConnector>;

    /// Layer type name; a builder holds at most one layer per name.
    fn name(&self) -> &'static str;

    /// Current settings, durations in milliseconds.
    fn config_json(&self) -> serde_json::Value;

    /// Serializable view of this layer.
    fn describe(&self) -> MiddlewareLayer {
        MiddlewareLayer::new(self.name(), self.config_json())
    }
}
