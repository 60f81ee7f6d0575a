//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the faucet.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Root configuration for the faucet.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FaucetConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Path of the append-only transaction log.
    pub transactions_log: String,

    /// Minimum seconds between two approved requests from one address on one testnet.
    pub cooldown_secs: u64,

    /// Address prefix and denomination shared by every testnet.
    pub cosmos: CosmosConfig,

    /// Node binary invocation settings.
    pub node: NodeConfig,

    /// Supported testnets keyed by the name clients pass as `chain`.
    pub testnets: BTreeMap<String, TestnetConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// HTTP surface settings.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            transactions_log: "transactions.csv".to_string(),
            cooldown_secs: 86_400,
            cosmos: CosmosConfig::default(),
            node: NodeConfig::default(),
            testnets: BTreeMap::new(),
            timeouts: TimeoutConfig::default(),
            http: HttpConfig::default(),
            observability: ObservabilityConfig::default(),
            admin: AdminConfig::default(),
        }
    }
}

impl FaucetConfig {
    /// Cooldown window as a duration.
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CosmosConfig {
    /// Bech32 prefix every accepted address must carry.
    pub prefix: String,

    /// Base denomination appended to amounts and fees.
    pub denomination: String,
}

impl Default for CosmosConfig {
    fn default() -> Self {
        Self {
            prefix: "cosmos".to_string(),
            denomination: "uatom".to_string(),
        }
    }
}

/// Settings for the node command-line binary.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Binary name or path (e.g., "gaiad").
    pub binary: String,

    /// Node home directory holding the keyring.
    pub home: String,

    /// Keyring backend used to sign transfers.
    pub keyring_backend: String,

    /// Deadline for a single binary invocation in seconds.
    pub timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            binary: "gaiad".to_string(),
            home: "~/.gaia".to_string(),
            keyring_backend: "test".to_string(),
            timeout_secs: 30,
        }
    }
}

impl NodeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// One supported test network.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TestnetConfig {
    /// RPC endpoint handed to the node binary as `--node`.
    pub node_url: String,

    /// Chain identifier for signing; defaults to the testnet name.
    #[serde(default)]
    pub chain_id: Option<String>,

    /// Account that funds every disbursement.
    pub faucet_address: String,

    /// Base units sent per approved request.
    pub amount_to_send: u64,

    /// Base units paid as fee per transfer.
    pub tx_fees: u64,

    /// Maximum base units disbursed per calendar day.
    pub daily_cap: u64,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds. Must
    /// outlast the node calls a disbursement makes.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 120 }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Answer cross-origin requests from any origin.
    pub cors_enabled: bool,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount the `/admin` routes.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
        }
    }
}
