//! # Transport Errors

use thiserror::Error;

/// Errors from transport operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// No live connection; the operation needs a session.
    #[error("Not connected to cluster")]
    NotConnected,

    /// The cluster rejected the login credentials.
    #[error("Login rejected: {0}")]
    LoginRejected(String),

    /// The cluster endpoint went away mid-operation.
    #[error("Cluster connection closed")]
    Closed,
}
