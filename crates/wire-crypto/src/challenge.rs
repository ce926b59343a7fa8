//! # Challenge and Proof
//!
//! A challenge binds an authentication attempt to the live session and the
//! moment of issue: `"{session_id}/{unix_millis}"`. It is created fresh per
//! attempt and never persisted, so a captured proof cannot be replayed
//! against a later session.

use std::time::{SystemTime, UNIX_EPOCH};
use wire_types::SessionId;

/// A freshly derived, single-use authentication challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge(String);

impl Challenge {
    /// Issue a challenge for the given session at the current time.
    #[must_use]
    pub fn issue(session_id: &SessionId) -> Self {
        Self::issue_at(session_id, unix_millis())
    }

    /// Issue a challenge with an explicit timestamp (test hook).
    #[must_use]
    pub fn issue_at(session_id: &SessionId, timestamp_millis: u128) -> Self {
        Self(format!("{session_id}/{timestamp_millis}"))
    }

    /// Reconstruct a challenge from its wire form.
    #[must_use]
    pub fn from_string(raw: String) -> Self {
        Self(raw)
    }

    /// The challenge string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The session identifier portion, if well formed.
    #[must_use]
    pub fn session_part(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(session, _)| session)
    }

    /// The timestamp portion in milliseconds, if well formed.
    #[must_use]
    pub fn timestamp_millis(&self) -> Option<u128> {
        self.0
            .rsplit_once('/')
            .and_then(|(_, millis)| millis.parse().ok())
    }
}

impl std::fmt::Display for Challenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A verifiable Ed25519 proof over a challenge (64 bytes).
#[derive(Clone, Copy)]
pub struct Proof([u8; 64]);

impl Proof {
    /// Create from raw signature bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Parse from a hex string (128 hex chars).
    #[must_use]
    pub fn from_hex(encoded: &str) -> Option<Self> {
        let raw = hex::decode(encoded).ok()?;
        let bytes: [u8; 64] = raw.try_into().ok()?;
        Some(Self(bytes))
    }

    /// Get raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Hex encoding of the proof.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for Proof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Proof({})", self.to_hex())
    }
}

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
