//! # Graph Wire Validator Test Suite
//!
//! Unified integration test crate for the validator pipeline.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── handshake.rs       # Challenge-response login and reconnect
//!     ├── pipeline.rs        # End-to-end get/put flow and republishing
//!     └── queue_ordering.rs  # FIFO, overlap, and middleware scoping
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p wire-validator-tests
//!
//! # By category
//! cargo test -p wire-validator-tests integration::handshake
//! cargo test -p wire-validator-tests integration::pipeline
//! cargo test -p wire-validator-tests integration::queue_ordering
//! ```

#![allow(dead_code)]
