//! # Wire Crypto Crate
//!
//! Challenge-response signing primitives used by the validator to prove its
//! identity to the cluster.
//!
//! ## Security Properties
//!
//! - Challenges are single-use: derived from the live session identifier and
//!   a millisecond timestamp, never persisted.
//! - Secret key material is zeroized on drop.
//! - Signing is deterministic Ed25519 (no RNG dependency at sign time).

pub mod challenge;
pub mod errors;
pub mod identity;

pub use challenge::{unix_millis, Challenge, Proof};
pub use errors::CryptoError;
pub use identity::{NodeIdentity, PublicKey};
