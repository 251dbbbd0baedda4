//! chainseries-middleware
//!
//! Wrappers that sit between the orchestrator and a raw source adapter.
//!
//! - [`ThrottledConnector`]: spaces consecutive upstream requests.
//! - [`BlacklistingMiddleware`]: takes a connector out of rotation after the
//!   upstream answers HTTP 429.
//! - [`LiveCachingConnector`]: memoizes live ticks for a short TTL.
//! - [`ConnectorBuilder`]: composes the above around a raw connector.

mod blacklist;
mod builder;
mod live_cache;
mod throttle;

pub use crate::blacklist::{BlacklistMiddleware, BlacklistingMiddleware};
pub use crate::builder::ConnectorBuilder;
pub use crate::live_cache::{LiveCacheMiddleware, LiveCachingConnector};
pub use crate::throttle::{ThrottleMiddleware, ThrottledConnector};
