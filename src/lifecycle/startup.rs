//! Startup orchestration.
//!
//! Wires the faucet from a validated configuration:
//! registry → admission engine → node adapter → transaction recorder.

use std::sync::Arc;

use crate::config::FaucetConfig;
use crate::faucet::{
    AdmissionEngine, Clock, Faucet, NetworkRegistry, SystemClock, TransactionRecorder,
};
use crate::node::{NodeAdapter, NodeCli};

/// Build the faucet backed by the node binary and the wall clock.
pub fn build_faucet(config: &FaucetConfig) -> Faucet {
    let node: Arc<dyn NodeAdapter> = Arc::new(NodeCli::new(
        config.node.clone(),
        config.cosmos.prefix.clone(),
    ));
    build_faucet_with(config, node, Arc::new(SystemClock))
}

/// Build the faucet around an arbitrary node adapter and clock.
pub fn build_faucet_with(
    config: &FaucetConfig,
    node: Arc<dyn NodeAdapter>,
    clock: Arc<dyn Clock>,
) -> Faucet {
    let registry = NetworkRegistry::from_config(config);
    let engine = AdmissionEngine::new(&registry, config.cooldown(), clock.clone());
    let recorder = TransactionRecorder::new(&config.transactions_log);

    for network in registry.iter() {
        tracing::info!(
            chain = %network.name,
            chain_id = %network.chain_id,
            node_url = %network.node_url,
            amount = %network.amount_with_denom(),
            daily_cap = network.daily_cap,
            "Testnet registered"
        );
    }

    Faucet::new(registry, engine, node, recorder, clock)
}
