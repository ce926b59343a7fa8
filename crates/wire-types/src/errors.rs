//! # Error Types
//!
//! Errors shared across crates. Transport, authentication, and configuration
//! errors live next to the code that raises them; only the validation error
//! is defined here because it crosses the queue/engine boundary.

use thiserror::Error;

/// Errors raised by the validation engine while judging a message.
///
/// Cloneable so a single outcome can travel through the queue's completion
/// channel and still be logged at the publish boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The message is not a shape the engine recognizes.
    #[error("Malformed wire message: {0}")]
    Malformed(String),

    /// A protocol rule handler failed while evaluating the message.
    #[error("Rule handler failed: {0}")]
    RuleFailed(String),

    /// The engine was shut down mid-evaluation.
    #[error("Validation engine unavailable")]
    EngineUnavailable,
}
