//! Shared utilities for integration and load testing.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use testnet_faucet::config::{FaucetConfig, TestnetConfig};
use testnet_faucet::faucet::{Faucet, ManualClock};
use testnet_faucet::lifecycle::{build_faucet_with, Shutdown};
use testnet_faucet::node::{Coin, NodeAdapter, NodeError, NodeResult, TransferRequest};
use testnet_faucet::HttpServer;

pub const TESTNET: &str = "theta-testnet-001";
pub const DEVNET: &str = "theta-devnet";
pub const ADMIN_KEY: &str = "test-admin-key";

/// In-memory stand-in for the node binary.
#[derive(Default)]
pub struct MockNode {
    pub fail_send: AtomicBool,
    pub fail_balance: AtomicBool,
    pub send_delay_ms: AtomicU64,
    pub sends: AtomicUsize,
}

#[async_trait]
impl NodeAdapter for MockNode {
    async fn validate_address(&self, address: &str) -> NodeResult<serde_json::Value> {
        if address.starts_with("cosmos1") && address.len() > 8 {
            Ok(serde_json::json!({ "human": "cosmos", "bytes": "00" }))
        } else {
            Err(NodeError::InvalidAddress(
                "decoding bech32 failed: invalid checksum".into(),
            ))
        }
    }

    async fn get_balances(&self, _address: &str, _node: &str) -> NodeResult<Vec<Coin>> {
        if self.fail_balance.load(Ordering::SeqCst) {
            return Err(NodeError::Process {
                command: "query bank balances".into(),
                stderr: "Error: post failed: connection refused".into(),
            });
        }
        Ok(vec![Coin::new("uatom", "1000000")])
    }

    async fn send_tokens(&self, _request: &TransferRequest) -> NodeResult<String> {
        let delay = self.send_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(NodeError::Process {
                command: "tx bank send".into(),
                stderr: "Error: rpc error: code = Unavailable desc = node is syncing".into(),
            });
        }
        let n = self.sends.fetch_add(1, Ordering::SeqCst);
        Ok(format!("TXHASH{:04}", n))
    }
}

/// Two testnets; the primary one dispenses `amount` up to `cap` per day.
pub fn test_config(amount: u64, cap: u64, cooldown_secs: u64) -> FaucetConfig {
    let mut config = FaucetConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.cooldown_secs = cooldown_secs;
    config.transactions_log = std::env::temp_dir()
        .join(format!("faucet-it-{}.csv", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();
    config.admin.enabled = true;
    config.admin.api_key = ADMIN_KEY.into();

    for name in [TESTNET, DEVNET] {
        config.testnets.insert(
            name.into(),
            TestnetConfig {
                node_url: "http://127.0.0.1:26657".into(),
                chain_id: None,
                faucet_address: "cosmos1faucetaddress".into(),
                amount_to_send: amount,
                tx_fees: 500,
                daily_cap: cap,
            },
        );
    }
    config
}

/// A faucet served on an ephemeral port.
#[allow(dead_code)]
pub struct TestFaucet {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub clock: Arc<ManualClock>,
    pub node: Arc<MockNode>,
    pub faucet: Arc<Faucet>,
    pub log: PathBuf,
    pub client: reqwest::Client,
}

#[allow(dead_code)]
impl TestFaucet {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.expect("faucet unreachable")
    }

    /// `GET /request` returning status and JSON body.
    pub async fn request(&self, address: &str, chain: &str) -> (u16, serde_json::Value) {
        let res = self
            .get(&format!("/request?address={}&chain={}", address, chain))
            .await;
        let status = res.status().as_u16();
        (status, res.json().await.expect("json body"))
    }

    pub fn log_lines(&self) -> Vec<String> {
        std::fs::read_to_string(&self.log)
            .map(|s| s.lines().map(String::from).collect())
            .unwrap_or_default()
    }
}

impl Drop for TestFaucet {
    fn drop(&mut self) {
        self.shutdown.trigger();
        let _ = std::fs::remove_file(&self.log);
    }
}

pub async fn start_faucet(config: FaucetConfig) -> TestFaucet {
    let node = Arc::new(MockNode::default());
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap(),
    ));
    let faucet = Arc::new(build_faucet_with(&config, node.clone(), clock.clone()));
    let log = PathBuf::from(&config.transactions_log);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, faucet.clone());
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    TestFaucet {
        addr,
        shutdown,
        clock,
        node,
        faucet,
        log,
        client,
    }
}
