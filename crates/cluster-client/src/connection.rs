//! # Connection Lifecycle Events
//!
//! The transport surfaces its lifecycle as a broadcast stream. The runtime
//! reacts to `Connected` by re-running the authentication handshake, and to
//! `Disconnected`/`Error` by scheduling a supervised reconnect.

use wire_types::SessionId;

/// A transport-level lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A connection was established and assigned a fresh session identifier.
    Connected {
        /// The cluster-assigned identifier for this session.
        session_id: SessionId,
    },

    /// The connection dropped; a session no longer exists.
    Disconnected,

    /// A transport-level error. Recovery is the reconnect policy's job.
    Error(String),
}
