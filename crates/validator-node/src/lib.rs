//! # Graph Wire Validator Node
//!
//! An authenticated validation node for a distributed graph-synchronization
//! cluster. The node subscribes to the raw `graph/get` and `graph/put`
//! channels, checks every message against a pluggable validation engine,
//! and republishes only the messages that pass to the corresponding
//! `*/validated` channels. Downstream peers subscribe to the validated
//! channels and never see rejected traffic.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌────────────────────── cluster ──────────────────────┐
//!                 │  graph/get      graph/put                           │
//!                 └──────┬──────────────┬───────────────────────────────┘
//!                        │              │
//!                  Dispatcher     ValidationQueue (FIFO, middleware)
//!                        │              │
//!                        └── Suppressor engine ──→ CompletionEvent
//!                                                       │
//!                                                   Publisher
//!                                                       │
//!                 ┌─────────────────────────────────────┴───────────────┐
//!                 │  graph/get/validated   graph/put/validated          │
//!                 └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Endpoint, credential, and reconnect configuration
//! - [`auth`] - Challenge-response login against the cluster
//! - [`middleware`] - Runtime-mutable queue middleware registry
//! - [`queue`] - FIFO write serialization with at-most-one in flight
//! - [`dispatch`] - Channel subscription and per-channel routing
//! - [`publish`] - Republishing of validated messages
//! - [`runtime`] - Supervised connect/authenticate/dispatch lifecycle
//!
//! Reads are validated concurrently; writes are serialized through the
//! queue so middleware observes a consistent order.

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod middleware;
pub mod publish;
pub mod queue;
pub mod runtime;

pub use auth::{AuthError, Authenticator};
pub use config::{ClusterConfig, ConfigError, IdentityConfig, ReconnectPolicy, ValidatorConfig};
pub use dispatch::Dispatcher;
pub use middleware::{HandlerId, MiddlewareChain, QueueMiddleware};
pub use publish::Publisher;
pub use queue::{CompletionEvent, ValidationQueue};
pub use runtime::WireValidator;
