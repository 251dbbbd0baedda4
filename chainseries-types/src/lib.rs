//! chainseries-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod attribution;
mod capability;
mod config;
mod connector;
mod error;
mod metric;
mod middleware;
mod reports;
mod series;

pub use attribution::{Attribution, Span};
pub use capability::Capability;
pub use config::{BlacklistConfig, EngineConfig, ThrottleConfig};
pub use connector::ConnectorKey;
pub use error::SeriesError;
pub use metric::Metric;
pub use middleware::{MiddlewareLayer, MiddlewareStack, RAW_CONNECTOR_LAYER};
pub use reports::{DataSource, Dataset};
pub use series::{Gap, LivePoint, Point, TimeSeries};
