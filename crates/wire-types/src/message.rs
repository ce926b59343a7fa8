//! # Wire Message
//!
//! The opaque unit of graph protocol traffic. The validator treats two
//! structurally equal messages as independent processing events; no identity
//! is assigned and no deduplication happens here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One unit of graph protocol read or write traffic.
///
/// The payload is opaque JSON understood by the validation engine. The node
/// relays it byte-for-byte: a published validated message carries the exact
/// payload that arrived on the input channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireMessage {
    /// Raw protocol payload.
    pub payload: Value,
}

impl WireMessage {
    /// Wrap a raw JSON payload.
    #[must_use]
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Borrow the raw payload.
    #[must_use]
    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

impl From<Value> for WireMessage {
    fn from(payload: Value) -> Self {
        Self::new(payload)
    }
}

/// Cluster-assigned connection identifier.
///
/// Opaque to the node; reassigned by the cluster on every reconnect, so a
/// stored `SessionId` is only meaningful for the connection that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a cluster-assigned identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
