//! # Wire Types Crate
//!
//! This crate contains the opaque wire message wrapper, the channel naming
//! contract, and the errors shared across the validator's crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Opaque Payloads**: The node never interprets a message beyond passing
//!   it through; `WireMessage` wraps raw JSON and nothing else.
//! - **Derived Channel Names**: Output channels are computed from input
//!   channels, never configured independently.

pub mod channels;
pub mod errors;
pub mod message;

pub use channels::{validated_channel, GET_CHANNEL, PUT_CHANNEL};
pub use errors::ValidationError;
pub use message::{SessionId, WireMessage};
