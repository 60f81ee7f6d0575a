//! Append-only log of successful disbursements.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// One successful disbursement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub timestamp: DateTime<Utc>,
    pub chain: String,
    pub address: String,
    /// Amount with denomination.
    pub amount: String,
    pub tx_hash: String,
    /// Faucet balance after the transfer, when it could be read.
    pub balance: Option<String>,
}

impl TransactionRecord {
    /// `timestamp,chain,address,amount,hash,balance`
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.timestamp.format("%Y-%m-%dT%H:%M:%S"),
            self.chain,
            self.address,
            self.amount,
            self.tx_hash,
            self.balance.as_deref().unwrap_or_default(),
        )
    }
}

#[derive(Debug)]
pub struct TransactionRecorder {
    path: PathBuf,
    /// Serializes appends so concurrent lines never interleave.
    write_lock: Mutex<()>,
}

impl TransactionRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line, creating the file if needed.
    pub async fn record(&self, entry: &TransactionRecord) -> std::io::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let mut line = entry.to_line();
        line.push('\n');
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}
