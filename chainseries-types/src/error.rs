use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every failure a connector, the cache, or the engine can report.
///
/// Values are cloneable and serializable so they can be carried as
/// warnings inside a [`crate::Dataset`].
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SeriesError {
    /// The requested capability is not implemented by the target connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// What was asked for, e.g. `range/price`.
        capability: String,
    },

    /// The upstream payload did not have the expected shape.
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument (e.g. a reversed date range).
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A connector failed in a way not covered by the transport variants.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Upstream name.
        connector: String,
        /// Failure text.
        msg: String,
    },

    /// The connection to the upstream could not be established.
    #[error("{connector} connection error: {msg}")]
    Connect {
        /// Upstream name.
        connector: String,
        /// Transport error text.
        msg: String,
    },

    /// The upstream answered with a non-2xx HTTP status.
    #[error("{connector} returned HTTP {status}")]
    HttpStatus {
        /// Upstream name.
        connector: String,
        /// Status code.
        status: u16,
    },

    /// The connector requires an API key that is not configured.
    #[error("{connector} requires an API key")]
    MissingApiKey {
        /// Upstream name.
        connector: String,
    },

    /// Anything else.
    #[error("unknown error: {0}")]
    Other(String),

    /// No source had data.
    #[error("not found: {what}")]
    NotFound {
        /// What was missing, e.g. `price series`.
        what: String,
    },

    /// Several providers failed, in the order they were tried.
    #[error("all providers failed: {0:?}")]
    AllProvidersFailed(Vec<SeriesError>),

    /// One provider call ran past `EngineConfig::provider_timeout`.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Upstream name.
        connector: String,
        /// `range`, `full-history` or `live`.
        capability: String,
    },

    /// A whole engine call ran past `EngineConfig::request_timeout`.
    #[error("request timed out: {capability}")]
    RequestTimeout {
        /// `series` or `metric`.
        capability: String,
    },

    /// Every provider tried for a capability timed out.
    #[error("all providers timed out: {capability}")]
    AllProvidersTimedOut {
        /// Capability label.
        capability: String,
    },

    /// The connector was rate limited recently and is being skipped.
    #[error("temporarily blacklisted: reset_in_ms={reset_in_ms}")]
    TemporarilyBlacklisted {
        /// Time left in the cool-down.
        reset_in_ms: u64,
    },

    /// Reading or writing the on-disk cache failed.
    #[error("cache error: {0}")]
    Cache(String),
}

impl SeriesError {
    /// `Unsupported` for `cap`.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// `Connector` failure with a message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// `NotFound` for `what`.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// `ProviderTimeout` for a connector and capability.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }

    /// `RequestTimeout` for an engine call.
    #[must_use]
    pub fn request_timeout(capability: impl Into<String>) -> Self {
        Self::RequestTimeout {
            capability: capability.into(),
        }
    }

    /// Short kebab-case label for the `reason` log field.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Unsupported { .. } => "unsupported",
            Self::Data(_) => "payload",
            Self::InvalidArg(_) => "invalid-argument",
            Self::Connector { .. } | Self::Other(_) => "connector",
            Self::Connect { .. } => "connect",
            Self::HttpStatus { .. } => "http-status",
            Self::MissingApiKey { .. } => "missing-api-key",
            Self::NotFound { .. } => "not-found",
            Self::AllProvidersFailed(_) => "all-failed",
            Self::ProviderTimeout { .. }
            | Self::RequestTimeout { .. }
            | Self::AllProvidersTimedOut { .. } => "timeout",
            Self::TemporarilyBlacklisted { .. } => "blacklisted",
            Self::Cache(_) => "cache",
        }
    }

    /// HTTP 429 from the upstream.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::HttpStatus { status: 429, .. })
    }

    /// Whether a caller can do something about this error.
    ///
    /// Missing capabilities and empty answers are not; an aggregate is
    /// actionable when any member is.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        match self {
            Self::Unsupported { .. } | Self::NotFound { .. } => false,
            Self::AllProvidersFailed(inner) => inner.iter().any(Self::is_actionable),
            _ => true,
        }
    }

    /// Individual failures, with nested aggregates expanded.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllProvidersFailed(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}
