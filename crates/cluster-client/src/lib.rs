//! # Cluster Client - Pub/Sub Transport for the Wire Validator
//!
//! The validator talks to its pub/sub cluster exclusively through the
//! [`Transport`] trait defined here: connection lifecycle events, a login
//! primitive for challenge-response authentication, gated channel
//! subscriptions, and fire-and-forget publishing.
//!
//! ```text
//! ┌──────────────┐                      ┌──────────────┐
//! │  Validator   │      publish()       │  Downstream  │
//! │    Node      │ ──────┐              │  Consumers   │
//! └──────────────┘       │              └──────────────┘
//!                        ▼                      ↑
//!                  ┌──────────────┐            │
//!                  │   Cluster    │ ───────────┘
//!                  │              │  subscribe("…/validated")
//!                  └──────────────┘
//! ```
//!
//! ## Gating
//!
//! Subscriptions opened with `wait_for_auth` deliver nothing until the
//! connection has completed a successful login. The gate drops again on
//! every disconnect, so re-authentication always precedes delivery.
//!
//! [`InMemoryCluster`] is the in-process implementation used for single-node
//! operation and the test suite.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod connection;
pub mod errors;
pub mod memory;
pub mod subscription;
pub mod transport;

// Re-export main types
pub use connection::ConnectionEvent;
pub use errors::TransportError;
pub use memory::InMemoryCluster;
pub use subscription::ChannelSubscription;
pub use transport::{LoginRequest, SubscribeOptions, Transport};

/// Maximum messages to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Maximum accepted age of a login challenge, in milliseconds.
pub const DEFAULT_MAX_CHALLENGE_AGE_MILLIS: u128 = 60_000;
