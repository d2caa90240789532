//! Connection identity used to key schema-backed caches.

pub mod config;

use std::fmt;
use std::sync::Arc;

use crate::core::{Result, error::require_name};

pub use config::ConnectionConfig;

/// Identity of a physical database.
///
/// Two keys are equal when they address the same database as the same user; the
/// password never participates. Schema-backed caches keep separate entries per
/// key because table shapes may differ between databases.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionKey(Arc<str>);

impl ConnectionKey {
    /// Wraps an opaque connection string. Fails for a blank string.
    pub fn new(connection: impl AsRef<str>) -> Result<Self> {
        let connection = require_name(connection.as_ref(), "connection string")?;
        Ok(Self(Arc::from(connection)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ConnectionKey {
    type Error = crate::core::MetaError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<&ConnectionConfig> for ConnectionKey {
    fn from(config: &ConnectionConfig) -> Self {
        Self(Arc::from(config.identity()))
    }
}
