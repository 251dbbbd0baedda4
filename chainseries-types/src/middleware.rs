use serde::{Deserialize, Serialize};

/// Layer name under which a stack records the unwrapped connector.
pub const RAW_CONNECTOR_LAYER: &str = "RawConnector";

/// One wrapper around a connector, as seen from outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiddlewareLayer {
    /// Middleware type, e.g. `ThrottlingMiddleware`.
    pub name: String,
    /// Layer settings; durations are stored in milliseconds under `*_ms` keys.
    pub config: serde_json::Value,
}

impl MiddlewareLayer {
    /// Layer called `name` with `config`.
    #[must_use]
    pub fn new(name: impl Into<String>, config: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Serializable description of a wrapped connector.
///
/// `layers[0]` is the wrapper a caller talks to. The last entry is the raw
/// connector once [`MiddlewareStack::push_raw`] has been called.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MiddlewareStack {
    /// Layers, outermost first.
    pub layers: Vec<MiddlewareLayer>,
}

impl MiddlewareStack {
    /// Stack with no layers.
    #[must_use]
    pub const fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Add `layer` beneath every layer already present.
    pub fn push_inner(&mut self, layer: MiddlewareLayer) {
        self.layers.push(layer);
    }

    /// Terminate the stack with the raw connector named `connector`.
    pub fn push_raw(&mut self, connector: &str) {
        self.push_inner(MiddlewareLayer::new(
            RAW_CONNECTOR_LAYER,
            serde_json::json!({ "name": connector }),
        ));
    }

    /// Layer names, outermost first.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name.as_str()).collect()
    }

    /// Settings of the first layer called `name`.
    #[must_use]
    pub fn config_of(&self, name: &str) -> Option<&serde_json::Value> {
        self.layers.iter().find(|l| l.name == name).map(|l| &l.config)
    }
}
