use std::fmt;

use serde::Serialize;

/// Stable name of a data source, used to rank connectors per metric.
///
/// Keys compare by string value, so a key built from a connector's
/// `name()` matches the `KEY` constant the connector exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConnectorKey(pub &'static str);

impl ConnectorKey {
    /// Key for the upstream named `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The upstream name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }

    /// Whether this key names the connector `name`.
    #[must_use]
    pub fn is(self, name: &str) -> bool {
        self.0 == name
    }
}

impl fmt::Display for ConnectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl From<ConnectorKey> for &'static str {
    fn from(k: ConnectorKey) -> Self {
        k.0
    }
}
