//! # Suppressor - Validation Engine Boundary
//!
//! The suppressor decides whether a protocol message is structurally
//! acceptable. Its internal rule set belongs to the graph protocol, not to
//! the validator; the node owns only the decision of *when* to invoke it.
//!
//! ## Contract
//!
//! - `validate` resolves to `Ok(true)` for messages that satisfy the rules,
//!   `Ok(false)` for messages the rules reject, and `Err(_)` when a rule
//!   handler itself fails.
//! - Implementations must be safe to invoke concurrently for read traffic;
//!   the write path serializes invocations externally.

pub mod structural;
pub mod traits;

pub use structural::StructuralSuppressor;
pub use traits::Suppressor;
