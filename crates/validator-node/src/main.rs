//! # Graph Wire Validator Binary
//!
//! Entry point for the validator node. Loads configuration from the
//! environment, wires the in-process cluster transport to the structural
//! validation engine, and runs the supervised connection lifecycle until
//! interrupted.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging
//! 2. Load configuration from `GRAPH_SC_*` / `GRAPH_NODE_*` variables
//! 3. Resolve the node keypair (fatal if missing or malformed)
//! 4. Connect, authenticate, and dispatch until Ctrl+C

use anyhow::Result;
use cluster_client::{InMemoryCluster, Transport};
use std::sync::Arc;
use suppressor::{StructuralSuppressor, Suppressor};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use validator_node::{ValidatorConfig, WireValidator};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ValidatorConfig::from_env();
    info!(
        hostname = %config.cluster.hostname,
        port = config.cluster.port,
        "Starting graph wire validator"
    );

    let cluster = Arc::new(InMemoryCluster::new());
    let engine: Arc<dyn Suppressor> = Arc::new(StructuralSuppressor::new());

    let node = match WireValidator::new(
        &config,
        Arc::clone(&cluster) as Arc<dyn Transport>,
        engine,
    ) {
        Ok(node) => node,
        Err(err) => {
            error!(%err, "Invalid configuration");
            std::process::exit(1);
        }
    };

    // The in-process cluster trusts the node's own key for login.
    if let Ok(identity) = config.resolve_identity() {
        cluster.trust(identity.public_key());
    }

    tokio::select! {
        result = node.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    Ok(())
}
