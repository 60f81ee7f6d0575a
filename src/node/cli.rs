//! Node adapter backed by the chain's command-line binary.
//!
//! # Responsibilities
//! - Build argument lists for `keys parse`, `query bank balances`, `tx bank send`
//! - Run the binary with a deadline, killing it when the deadline passes
//! - Reduce failures to the first stderr line

use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::schema::NodeConfig;
use crate::node::adapter::NodeAdapter;
use crate::node::types::{Coin, NodeError, NodeResult, TransferRequest};
use crate::observability::metrics;

const OUTPUT_JSON: &str = "--output=json";

/// Shells out to the node binary (e.g. `gaiad`).
#[derive(Debug, Clone)]
pub struct NodeCli {
    config: NodeConfig,
    /// Required bech32 prefix; empty disables the pre-check.
    address_prefix: String,
    timeout_duration: Duration,
}

#[derive(Deserialize)]
struct BalancesResponse {
    balances: Vec<Coin>,
}

#[derive(Deserialize)]
struct BroadcastResponse {
    txhash: String,
    #[serde(default)]
    code: u32,
    #[serde(default)]
    raw_log: String,
}

impl NodeCli {
    pub fn new(config: NodeConfig, address_prefix: impl Into<String>) -> Self {
        let timeout_duration = config.timeout();
        Self {
            config,
            address_prefix: address_prefix.into(),
            timeout_duration,
        }
    }

    fn home_flag(&self) -> String {
        format!("--home={}", self.config.home)
    }

    fn parse_args(&self, address: &str) -> Vec<String> {
        vec![
            "keys".into(),
            "parse".into(),
            address.into(),
            self.home_flag(),
            OUTPUT_JSON.into(),
        ]
    }

    fn balance_args(&self, address: &str, node: &str) -> Vec<String> {
        vec![
            "query".into(),
            "bank".into(),
            "balances".into(),
            address.into(),
            format!("--node={}", node),
            self.home_flag(),
            OUTPUT_JSON.into(),
        ]
    }

    fn send_args(&self, request: &TransferRequest) -> Vec<String> {
        vec![
            "tx".into(),
            "bank".into(),
            "send".into(),
            request.sender.clone(),
            request.recipient.clone(),
            request.amount.clone(),
            format!("--fees={}", request.fees),
            format!("--node={}", request.node),
            format!("--chain-id={}", request.chain_id),
            self.home_flag(),
            format!("--keyring-backend={}", self.config.keyring_backend),
            OUTPUT_JSON.into(),
            "-y".into(),
        ]
    }

    /// Run the binary and return its stdout, or the reason it failed.
    async fn run(&self, command: &'static str, args: Vec<String>) -> NodeResult<String> {
        let start = Instant::now();
        tracing::debug!(binary = %self.config.binary, command, "Invoking node binary");

        let child = Command::new(&self.config.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .inspect_err(|_| metrics::record_node_call(command, false, start))?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = match timeout(self.timeout_duration, child.wait_with_output()).await {
            Ok(result) => result.inspect_err(|_| metrics::record_node_call(command, false, start))?,
            Err(_) => {
                metrics::record_node_call(command, false, start);
                tracing::error!(command, secs = self.config.timeout_secs, "Node binary timed out");
                return Err(NodeError::Timeout {
                    command: command.to_string(),
                    secs: self.config.timeout_secs,
                });
            }
        };

        if !output.status.success() {
            metrics::record_node_call(command, false, start);
            let mut stderr = first_line(&output.stderr);
            if stderr.is_empty() {
                stderr = format!("{} exited with {}", command, output.status);
            }
            tracing::error!(command, status = %output.status, stderr = %stderr, "Node binary failed");
            return Err(NodeError::Process {
                command: command.to_string(),
                stderr,
            });
        }

        metrics::record_node_call(command, true, start);
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl NodeAdapter for NodeCli {
    async fn validate_address(&self, address: &str) -> NodeResult<serde_json::Value> {
        if !self.address_prefix.is_empty() && !address.starts_with(&self.address_prefix) {
            return Err(NodeError::InvalidAddress(format!(
                "address must start with '{}'",
                self.address_prefix
            )));
        }

        let stdout = match self.run("keys parse", self.parse_args(address)).await {
            Ok(stdout) => stdout,
            Err(NodeError::Process { stderr, .. }) => return Err(NodeError::InvalidAddress(stderr)),
            Err(e) => return Err(e),
        };

        serde_json::from_str(stdout.trim())
            .map_err(|e| NodeError::Malformed(format!("keys parse: {}", e)))
    }

    async fn get_balances(&self, address: &str, node: &str) -> NodeResult<Vec<Coin>> {
        let stdout = self
            .run("query bank balances", self.balance_args(address, node))
            .await?;
        parse_balances(&stdout)
    }

    async fn send_tokens(&self, request: &TransferRequest) -> NodeResult<String> {
        let stdout = self.run("tx bank send", self.send_args(request)).await?;
        parse_tx_hash(&stdout)
    }
}

/// First line of a process's stderr, lossily decoded.
pub fn first_line(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

pub fn parse_balances(stdout: &str) -> NodeResult<Vec<Coin>> {
    serde_json::from_str::<BalancesResponse>(stdout)
        .map(|r| r.balances)
        .map_err(|e| NodeError::Malformed(format!("balances: {}", e)))
}

/// Extract the hash of a broadcast; a non-zero code means the node rejected it.
pub fn parse_tx_hash(stdout: &str) -> NodeResult<String> {
    let response: BroadcastResponse = serde_json::from_str(stdout)
        .map_err(|e| NodeError::Malformed(format!("tx response: {}", e)))?;

    if response.code != 0 {
        return Err(NodeError::Process {
            command: "tx bank send".to_string(),
            stderr: first_line(response.raw_log.as_bytes()),
        });
    }
    Ok(response.txhash)
}
