//! Signal K delta store
//!
//! Keeps the latest value per path for the vessel this host runs on. It is
//! fed newline-delimited JSON: an optional hello message naming the `self`
//! context, then delta messages:
//!
//! ```json
//! {"context": "vessels.urn:mrn:imo:mmsi:230099999",
//!  "updates": [{"timestamp": "2024-01-01T00:00:00Z",
//!               "values": [{"path": "navigation.speedOverGround", "value": 3.85}]}]}
//! ```
//!
//! Until a hello arrives every context is accepted.

use std::collections::HashMap;

use log::{debug, info, trace, warn};
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::Value;
use skoled_core::{DataSource, PathValue};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Prefix Signal K puts on vessel contexts
const VESSELS_PREFIX: &str = "vessels.";

/// Context alias for "this vessel"
const SELF_ALIAS: &str = "vessels.self";

/// Error type for incoming messages
#[derive(Debug, thiserror::Error)]
pub enum DeltaError {
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Message is neither a hello nor a delta")]
    Unrecognised,
}

/// What a message did to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Hello message; the self context is now known
    Hello(String),
    /// Delta for this vessel; this many values stored
    Values(usize),
    /// Delta for some other context
    Foreign,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(rename = "self")]
    self_context: Option<String>,
    context: Option<String>,
    updates: Option<Vec<Update>>,
}

#[derive(Debug, Deserialize)]
struct Update {
    timestamp: Option<String>,
    #[serde(default)]
    values: Vec<UpdateValue>,
}

#[derive(Debug, Deserialize)]
struct UpdateValue {
    path: String,
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Default)]
struct StoreInner {
    self_context: Option<String>,
    values: HashMap<String, PathValue>,
}

/// Latest value per path, shared between the delta reader and the timer
#[derive(Debug, Default)]
pub struct SignalKStore {
    inner: RwLock<StoreInner>,
}

impl SignalKStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The self context announced by the hello message, if any
    pub fn self_context(&self) -> Option<String> {
        self.inner.read().self_context.clone()
    }

    /// Number of paths with a value
    pub fn len(&self) -> usize {
        self.inner.read().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().values.is_empty()
    }

    /// Store a value directly
    pub fn insert(&self, path: &str, value: Value, timestamp: &str) {
        self.inner
            .write()
            .values
            .insert(path.to_string(), PathValue::new(value, timestamp));
    }

    /// Apply one line of the stream
    pub fn apply_line(&self, line: &str) -> Result<Applied, DeltaError> {
        let message: Message = serde_json::from_str(line)?;

        if let Some(updates) = message.updates {
            return Ok(self.apply_delta(message.context.as_deref(), updates));
        }

        if let Some(self_context) = message.self_context {
            let self_context = normalise_context(&self_context);
            info!("Signal K self context: {}", self_context);
            self.inner.write().self_context = Some(self_context.clone());
            return Ok(Applied::Hello(self_context));
        }

        Err(DeltaError::Unrecognised)
    }

    fn apply_delta(&self, context: Option<&str>, updates: Vec<Update>) -> Applied {
        let mut inner = self.inner.write();

        if !is_self(inner.self_context.as_deref(), context) {
            trace!("ignoring delta for {:?}", context);
            return Applied::Foreign;
        }

        let mut stored = 0;
        for update in updates {
            let timestamp = update.timestamp.unwrap_or_default();
            for entry in update.values {
                // Root-level values (vessel name, mmsi) have an empty path
                if entry.path.is_empty() {
                    continue;
                }
                trace!("{} = {}", entry.path, entry.value);
                inner
                    .values
                    .insert(entry.path, PathValue::new(entry.value, timestamp.as_str()));
                stored += 1;
            }
        }

        Applied::Values(stored)
    }
}

impl DataSource for SignalKStore {
    fn current_value(&self, path: &str) -> Option<PathValue> {
        self.inner.read().values.get(path).cloned()
    }
}

/// `urn:mrn:...` and `vessels.urn:mrn:...` name the same vessel
fn normalise_context(context: &str) -> String {
    if context.starts_with(VESSELS_PREFIX) {
        context.to_string()
    } else {
        format!("{}{}", VESSELS_PREFIX, context)
    }
}

fn is_self(self_context: Option<&str>, context: Option<&str>) -> bool {
    match (self_context, context) {
        // Deltas without a context are about the server's own vessel
        (_, None) => true,
        (_, Some(SELF_ALIAS)) => true,
        (None, Some(_)) => true,
        (Some(own), Some(context)) => normalise_context(context) == own,
    }
}

/// Feed every line of `reader` into `store` until end of input
///
/// Malformed lines are logged and skipped. Returns the number of values
/// stored.
pub async fn pump_deltas<R>(store: &SignalKStore, reader: R) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut stored = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match store.apply_line(line) {
            Ok(Applied::Values(count)) => stored += count,
            Ok(_) => {}
            Err(e) => warn!("Skipping line: {}", e),
        }
    }

    debug!("delta stream closed, {} values stored", stored);
    Ok(stored)
}
