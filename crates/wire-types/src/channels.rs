//! # Channel Naming Contract
//!
//! Input channels carry the permissionless read/write streams; the validator
//! republishes passing messages onto deterministically derived output
//! channels. Downstream consumers subscribe only to the derived channels.

/// Input channel for graph read traffic.
pub const GET_CHANNEL: &str = "graph/get";

/// Input channel for graph write traffic.
pub const PUT_CHANNEL: &str = "graph/put";

/// Derive the validated output channel for an input channel.
///
/// `graph/get` → `graph/get/validated`, `graph/put` → `graph/put/validated`.
#[must_use]
pub fn validated_channel(input: &str) -> String {
    format!("{input}/validated")
}
