//! # Suppressor Trait

use async_trait::async_trait;
use wire_types::{ValidationError, WireMessage};

/// Pluggable component that judges whether a protocol message is acceptable.
#[async_trait]
pub trait Suppressor: Send + Sync {
    /// Asynchronously report whether the message satisfies protocol rules.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` - the message passes and may be republished
    /// - `Ok(false)` - the message fails the rules and must be dropped
    /// - `Err(_)` - a rule handler failed; the message must be dropped
    async fn validate(&self, message: &WireMessage) -> Result<bool, ValidationError>;
}
