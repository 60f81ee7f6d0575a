//! Node adapter types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One balance entry as reported by the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    /// Decimal string; chains report amounts wider than u64.
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

/// Everything the node binary needs to sign and broadcast a bank transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub sender: String,
    pub recipient: String,
    /// Amount with denomination suffix, e.g. `10000uatom`.
    pub amount: String,
    /// Fee with denomination suffix.
    pub fees: String,
    pub chain_id: String,
    pub node: String,
}

/// Errors that can occur while driving the node binary.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The binary refused to parse the address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The binary exited unsuccessfully; carries its first stderr line.
    #[error("{stderr}")]
    Process { command: String, stderr: String },

    /// The binary did not finish before the deadline.
    #[error("{command} timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },

    /// The binary could not be started.
    #[error("failed to start node binary: {0}")]
    Spawn(#[from] std::io::Error),

    /// The binary succeeded but its output was not what we expected.
    #[error("unexpected node output: {0}")]
    Malformed(String),
}

impl NodeError {
    /// Whether the failure proves no transaction left the node: the binary
    /// never started, or it exited unsuccessfully. A timeout or unreadable
    /// output after a clean exit leaves the broadcast in an unknown state.
    pub fn nothing_broadcast(&self) -> bool {
        matches!(self, NodeError::Process { .. } | NodeError::Spawn(_))
    }
}

/// Result type for node operations.
pub type NodeResult<T> = Result<T, NodeError>;
