//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::FaucetConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<FaucetConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<FaucetConfig, ConfigError> {
    let config: FaucetConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
transactions_log = "/var/log/faucet/transactions.csv"
cooldown_secs = 3600

[cosmos]
prefix = "cosmos"
denomination = "uatom"

[node]
binary = "gaiad"
home = "/home/faucet/.gaia"

[testnets.theta-testnet-001]
node_url = "https://rpc.sentry-01.theta-testnet.polypore.xyz:443"
faucet_address = "cosmos1faucetaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
amount_to_send = 10000000
tx_fees = 1000
daily_cap = 100000000000

[testnets.local]
node_url = "http://127.0.0.1:26657"
chain_id = "local-1"
faucet_address = "cosmos1localfaucet"
amount_to_send = 5
tx_fees = 1
daily_cap = 50
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.cooldown_secs, 3600);
        assert_eq!(config.testnets.len(), 2);
        assert_eq!(config.node.keyring_backend, "test");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");

        let theta = &config.testnets["theta-testnet-001"];
        assert_eq!(theta.amount_to_send, 10_000_000);
        assert!(theta.chain_id.is_none());
        assert_eq!(config.testnets["local"].chain_id.as_deref(), Some("local-1"));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("cooldown_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_lists_problems() {
        let err = parse_config("cooldown_secs = 0").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("cooldown_secs must be greater than zero"));
        assert!(message.contains("no testnets configured"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/faucet.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
