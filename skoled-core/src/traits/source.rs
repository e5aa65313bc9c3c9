//! Telemetry data source trait

use alloc::string::String;
use serde_json::Value;

/// Latest known value of one path
#[derive(Debug, Clone, PartialEq)]
pub struct PathValue {
    /// Raw value as delivered by the host (number, string, object...)
    pub value: Value,
    /// ISO 8601 timestamp of the update, as delivered
    pub timestamp: String,
}

impl PathValue {
    /// Create a value with its timestamp
    pub fn new(value: Value, timestamp: impl Into<String>) -> Self {
        Self {
            value,
            timestamp: timestamp.into(),
        }
    }
}

/// Read-only view of the host's current values
///
/// Lookups must not block; a path with no value yet returns `None`.
pub trait DataSource {
    /// Latest value for a dotted path such as `navigation.speedOverGround`
    fn current_value(&self, path: &str) -> Option<PathValue>;
}

impl<T: DataSource + ?Sized> DataSource for &T {
    fn current_value(&self, path: &str) -> Option<PathValue> {
        (**self).current_value(path)
    }
}
