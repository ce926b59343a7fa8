//! # Structural Suppressor
//!
//! Default rule set checking the shape of graph wire traffic. Deliberately
//! shallow: authorship and conflict-resolution rules belong to the protocol
//! implementation plugged in behind the [`Suppressor`] trait.
//!
//! ## Accepted Shapes
//!
//! - Get: an object whose `get` member is an object.
//! - Put: an object whose `put` member maps soul strings to node records;
//!   each record must be an object.
//! - Any other object without `get`/`put` members is passed through as
//!   protocol-internal traffic (acks, handshakes).

use crate::traits::Suppressor;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use wire_types::{ValidationError, WireMessage};

/// Structural rule set for graph wire messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralSuppressor;

impl StructuralSuppressor {
    /// Create the default structural rule set.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn check_put(diff: &Value) -> bool {
        let Some(nodes) = diff.as_object() else {
            return false;
        };
        if nodes.is_empty() {
            return false;
        }
        // Every soul maps to an object of attributes.
        nodes
            .iter()
            .all(|(soul, record)| !soul.is_empty() && record.is_object())
    }

    fn check_get(lex: &Value) -> bool {
        lex.as_object().is_some_and(|query| !query.is_empty())
    }
}

#[async_trait]
impl Suppressor for StructuralSuppressor {
    async fn validate(&self, message: &WireMessage) -> Result<bool, ValidationError> {
        let Some(body) = message.payload().as_object() else {
            return Err(ValidationError::Malformed(
                "wire message is not an object".into(),
            ));
        };

        let verdict = match (body.get("put"), body.get("get")) {
            (Some(diff), _) => Self::check_put(diff),
            (None, Some(lex)) => Self::check_get(lex),
            // Protocol-internal traffic (acks, handshakes) passes through.
            (None, None) => true,
        };

        debug!(valid = verdict, "Structural validation complete");
        Ok(verdict)
    }
}
