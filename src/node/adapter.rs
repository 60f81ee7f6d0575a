//! Capability interface for the chain-facing operations.

use async_trait::async_trait;

use crate::node::types::{Coin, NodeResult, TransferRequest};

/// Chain operations the faucet depends on.
///
/// Any backing implementation (CLI shell-out, RPC client) satisfies the
/// admission flow identically.
#[async_trait]
pub trait NodeAdapter: Send + Sync {
    /// Check address syntax; returns the parsed representation.
    async fn validate_address(&self, address: &str) -> NodeResult<serde_json::Value>;

    /// List balances of `address` as seen by the node at `node`.
    async fn get_balances(&self, address: &str, node: &str) -> NodeResult<Vec<Coin>>;

    /// Sign and broadcast a transfer; returns the transaction hash.
    async fn send_tokens(&self, request: &TransferRequest) -> NodeResult<String>;
}
