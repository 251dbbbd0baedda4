//! Re-export of foundational types from `chainseries-types`.
// Consolidated re-exports so downstream crates can depend on `chainseries-core` only

pub use chainseries_types::{Capability, ConnectorKey, SeriesError};
pub use chainseries_types::{
    Attribution, BlacklistConfig, DataSource, Dataset, EngineConfig, Span, ThrottleConfig,
};
pub use chainseries_types::{Gap, LivePoint, Metric, Point, TimeSeries};
pub use chainseries_types::{MiddlewareLayer, MiddlewareStack};

pub use chrono::{DateTime, NaiveDate, Utc};
