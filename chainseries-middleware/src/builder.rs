//! Builder for composing connectors with middleware layers.
//!
//! Layers form an onion around the raw connector. The `layers` vector is
//! stored outermost-first (last added = outermost) and applied in reverse
//! during `build()`:
//!
//! ```text
//! builder.with_throttle(..).with_blacklist(..)
//!
//! Storage: [Blacklist, Throttle]  (outermost first)
//! Applied:  Raw -> Throttle -> Blacklist
//! Result:   Blacklist(Throttle(Raw))
//! ```
//!
//! With that order a blacklisted connector fails fast instead of waiting out
//! the throttle first. This matches [`MiddlewareStack`] where `layers[0]` is
//! the outermost layer.

use std::sync::Arc;
use std::time::Duration;

use chainseries_core::Middleware;
use chainseries_core::connector::SeriesConnector;
use chainseries_types::{BlacklistConfig, MiddlewareStack, ThrottleConfig};
use serde_json::json;

use crate::blacklist::BlacklistMiddleware;
use crate::live_cache::LiveCacheMiddleware;
use crate::throttle::ThrottleMiddleware;

const THROTTLE: &str = "ThrottlingMiddleware";
const BLACKLIST: &str = "BlacklistingMiddleware";
const LIVE_CACHE: &str = "LiveCacheMiddleware";

fn ms(cfg: &serde_json::Value, key: &str) -> Option<Duration> {
    cfg.get(key)
        .and_then(serde_json::Value::as_u64)
        .map(Duration::from_millis)
}

/// Generic middleware builder for composing a connector with layered wrappers.
pub struct ConnectorBuilder {
    raw: Arc<dyn SeriesConnector>,
    /// Middleware layers in outermost-first order.
    layers: Vec<Box<dyn Middleware>>,
}

impl ConnectorBuilder {
    /// Create a new builder from a raw, unwrapped connector.
    #[must_use]
    pub fn new(raw: Arc<dyn SeriesConnector>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    fn replace_outermost(mut self, layer: Box<dyn Middleware>) -> Self {
        let name = layer.name();
        self.layers.retain(|m| m.name() != name);
        self.layers.insert(0, layer);
        self
    }

    fn without(mut self, name: &str) -> Self {
        self.layers.retain(|m| m.name() != name);
        self
    }

    /// Add or replace request throttling at the outermost position.
    #[must_use]
    pub fn with_throttle(self, cfg: ThrottleConfig) -> Self {
        self.replace_outermost(Box::new(ThrottleMiddleware::new(cfg)))
    }

    /// Remove throttling if present.
    #[must_use]
    pub fn without_throttle(self) -> Self {
        self.without(THROTTLE)
    }

    /// Add or replace rate-limit blacklisting at the outermost position.
    #[must_use]
    pub fn with_blacklist(self, cfg: BlacklistConfig) -> Self {
        self.replace_outermost(Box::new(BlacklistMiddleware::new(cfg.duration)))
    }

    /// Remove blacklisting if present.
    #[must_use]
    pub fn without_blacklist(self) -> Self {
        self.without(BLACKLIST)
    }

    /// Add or replace live-tick caching at the outermost position.
    #[must_use]
    pub fn with_live_cache(self, ttl: Duration) -> Self {
        self.replace_outermost(Box::new(LiveCacheMiddleware::new(ttl)))
    }

    /// Remove live-tick caching if present.
    #[must_use]
    pub fn without_live_cache(self) -> Self {
        self.without(LIVE_CACHE)
    }

    /// Add an arbitrary middleware layer at the outermost position.
    #[must_use]
    pub fn layer(mut self, layer: Box<dyn Middleware>) -> Self {
        self.layers.insert(0, layer);
        self
    }

    /// Describe the configured layers, ending with the raw connector.
    #[must_use]
    pub fn to_stack(&self) -> MiddlewareStack {
        let mut stack = MiddlewareStack::new();
        for layer in &self.layers {
            stack.push_inner(layer.describe());
        }
        stack.push_raw(self.raw.name());
        stack
    }

    /// Construct a builder from a raw connector and an explicit stack.
    ///
    /// Inverse of [`to_stack`](Self::to_stack). Unknown layer names are ignored.
    #[must_use]
    pub fn from_stack(raw: Arc<dyn SeriesConnector>, stack: &MiddlewareStack) -> Self {
        let mut layers: Vec<Box<dyn Middleware>> = Vec::new();
        for l in &stack.layers {
            match l.name.as_str() {
                THROTTLE => {
                    let min_interval = ms(&l.config, "min_interval_ms")
                        .unwrap_or_else(|| ThrottleConfig::default().min_interval);
                    layers.push(Box::new(ThrottleMiddleware::new(ThrottleConfig {
                        min_interval,
                    })));
                }
                BLACKLIST => {
                    let duration = ms(&l.config, "duration_ms")
                        .unwrap_or_else(|| BlacklistConfig::default().duration);
                    layers.push(Box::new(BlacklistMiddleware::new(duration)));
                }
                LIVE_CACHE => {
                    let ttl = ms(&l.config, "ttl_ms").unwrap_or(Duration::ZERO);
                    layers.push(Box::new(LiveCacheMiddleware::new(ttl)));
                }
                _ => {}
            }
        }
        Self { raw, layers }
    }

    /// Build the wrapped connector, applying layers innermost first.
    #[must_use]
    pub fn build(self) -> Arc<dyn SeriesConnector> {
        let mut acc: Arc<dyn SeriesConnector> = Arc::clone(&self.raw);
        for m in self.layers.into_iter().rev() {
            acc = m.apply(acc);
        }
        acc
    }
}
