//! Cassette data structures for recording and replaying interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded call on a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number, assigned by the recorder.
    pub seq: u64,
    /// Port name (`launcher`, `processes` or `shell`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Arguments the port was called with.
    pub input: serde_json::Value,
    /// What the port returned, as `{"ok": ..}` or `{"err": ..}`.
    pub output: serde_json::Value,
}

/// An ordered set of interactions captured in one session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Version of the tool that produced it.
    pub recorded_by: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}
