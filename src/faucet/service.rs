//! Faucet service: balance reads and the disbursement flow.
//!
//! # Request Flow
//! ```text
//! request_tokens(address, chain)
//!     → registry lookup            (UnknownNetwork)
//!     → node.validate_address      (InvalidAddress / Adapter)
//!     → engine.admit               (DailyCapReached / CooldownActive)
//!     → node.send_tokens ── Process/Spawn ──→ engine.release → TransferFailed
//!                        ── Timeout/Malformed ──→ reservation kept → TransferFailed
//!     → faucet balance (best effort)
//!     → recorder.record (best effort)
//! ```

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::faucet::admission::AdmissionEngine;
use crate::faucet::clock::Clock;
use crate::faucet::error::{FaucetError, FaucetResult};
use crate::faucet::recorder::{TransactionRecord, TransactionRecorder};
use crate::faucet::registry::{Network, NetworkRegistry};
use crate::node::{Coin, NodeAdapter, TransferRequest};
use crate::observability::metrics;

/// Outcome of an approved and broadcast request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Disbursement {
    /// Amount with denomination.
    pub amount: String,
    pub tx_hash: String,
}

pub struct Faucet {
    registry: NetworkRegistry,
    engine: AdmissionEngine,
    node: Arc<dyn NodeAdapter>,
    recorder: TransactionRecorder,
    clock: Arc<dyn Clock>,
}

impl Faucet {
    pub fn new(
        registry: NetworkRegistry,
        engine: AdmissionEngine,
        node: Arc<dyn NodeAdapter>,
        recorder: TransactionRecorder,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            engine,
            node,
            recorder,
            clock,
        }
    }

    pub fn registry(&self) -> &NetworkRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &AdmissionEngine {
        &self.engine
    }

    /// Balances of `address` on `chain`. Not rate limited.
    pub async fn query_balance(&self, address: &str, chain: &str) -> FaucetResult<Vec<Coin>> {
        let network = self.registry.get(chain)?;
        self.node.validate_address(address).await?;
        let balances = self.node.get_balances(address, &network.node_url).await?;
        Ok(balances)
    }

    /// Admit, transfer, and record one disbursement.
    pub async fn request_tokens(&self, address: &str, chain: &str) -> FaucetResult<Disbursement> {
        let start = Instant::now();
        let network = self.registry.get(chain)?;
        self.node.validate_address(address).await?;

        let reservation = self.engine.admit(network, address)?;

        let transfer = TransferRequest {
            sender: network.faucet_address.clone(),
            recipient: address.to_string(),
            amount: network.amount_with_denom(),
            fees: network.fee_with_denom(),
            chain_id: network.chain_id.clone(),
            node: network.node_url.clone(),
        };

        let tx_hash = match self.node.send_tokens(&transfer).await {
            Ok(hash) => hash,
            Err(e) if e.nothing_broadcast() => {
                self.engine.release(&reservation);
                tracing::error!(
                    chain = %network.name,
                    address = %address,
                    error = %e,
                    "Transfer failed"
                );
                return Err(FaucetError::TransferFailed(e.to_string()));
            }
            Err(e) => {
                // The broadcast may have landed; keep the cap charged and the address locked.
                tracing::error!(
                    chain = %network.name,
                    address = %address,
                    error = %e,
                    "Transfer outcome unknown, reservation kept"
                );
                return Err(FaucetError::TransferFailed(e.to_string()));
            }
        };

        tracing::info!(
            chain = %network.name,
            address = %address,
            amount = %transfer.amount,
            tx_hash = %tx_hash,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Tokens sent"
        );
        metrics::record_disbursement(&network.name, network.amount_to_send);

        let record = TransactionRecord {
            timestamp: self.clock.now(),
            chain: network.name.clone(),
            address: address.to_string(),
            amount: transfer.amount.clone(),
            tx_hash: tx_hash.clone(),
            balance: self.faucet_balance(network).await,
        };
        if let Err(e) = self.recorder.record(&record).await {
            tracing::error!(
                path = %self.recorder.path().display(),
                tx_hash = %tx_hash,
                error = %e,
                "Failed to write transaction log"
            );
        }

        Ok(Disbursement {
            amount: transfer.amount,
            tx_hash,
        })
    }

    /// Faucet balance in the network's denomination; `None` when unavailable.
    async fn faucet_balance(&self, network: &Network) -> Option<String> {
        match self
            .node
            .get_balances(&network.faucet_address, &network.node_url)
            .await
        {
            Ok(coins) => coins
                .into_iter()
                .find(|c| c.denom == network.denom)
                .map(|c| format!("{}{}", c.amount, c.denom)),
            Err(e) => {
                tracing::warn!(chain = %network.name, error = %e, "Could not read faucet balance");
                None
            }
        }
    }
}

impl std::fmt::Debug for Faucet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Faucet")
            .field("networks", &self.registry.names())
            .field("engine", &self.engine)
            .field("log", &self.recorder.path())
            .finish()
    }
}
