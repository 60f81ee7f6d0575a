//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (amounts > 0, amount within cap, timeouts > 0)
//! - Validate addresses and endpoints parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FaucetConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::FaucetConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no testnets configured")]
    NoTestnets,

    #[error("testnet '{testnet}': {field} must be greater than zero")]
    ZeroAmount { testnet: String, field: &'static str },

    #[error("testnet '{testnet}': amount_to_send {amount} exceeds daily_cap {cap}")]
    AmountAboveCap { testnet: String, amount: u64, cap: u64 },

    #[error("testnet '{testnet}': faucet_address is empty")]
    MissingFaucetAddress { testnet: String },

    #[error("testnet '{testnet}': invalid node_url '{url}'")]
    InvalidNodeUrl { testnet: String, url: String },

    #[error("{field}: invalid socket address '{value}'")]
    InvalidSocketAddr { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("admin.api_key must be set when the admin surface is enabled")]
    MissingAdminKey,

    #[error("timeouts.request_secs ({request_secs}) must exceed {calls} node calls of {node_secs}s")]
    RequestDeadlineTooShort { request_secs: u64, node_secs: u64, calls: u64 },
}

/// Node invocations one disbursement may make: validate, send, balance.
pub const NODE_CALLS_PER_REQUEST: u64 = 3;

/// Check every semantic rule, collecting all failures.
pub fn validate_config(config: &FaucetConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidSocketAddr {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidSocketAddr {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.cooldown_secs == 0 {
        errors.push(ValidationError::ZeroDuration("cooldown_secs"));
    }
    if config.node.timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration("node.timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroDuration("timeouts.request_secs"));
    }

    let node_budget = config
        .node
        .timeout_secs
        .saturating_mul(NODE_CALLS_PER_REQUEST);
    if config.node.timeout_secs > 0 && config.timeouts.request_secs <= node_budget {
        errors.push(ValidationError::RequestDeadlineTooShort {
            request_secs: config.timeouts.request_secs,
            node_secs: config.node.timeout_secs,
            calls: NODE_CALLS_PER_REQUEST,
        });
    }

    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::MissingAdminKey);
    }

    if config.testnets.is_empty() {
        errors.push(ValidationError::NoTestnets);
    }

    for (name, testnet) in &config.testnets {
        for (field, value) in [
            ("amount_to_send", testnet.amount_to_send),
            ("tx_fees", testnet.tx_fees),
            ("daily_cap", testnet.daily_cap),
        ] {
            if value == 0 {
                errors.push(ValidationError::ZeroAmount {
                    testnet: name.clone(),
                    field,
                });
            }
        }

        if testnet.amount_to_send > testnet.daily_cap {
            errors.push(ValidationError::AmountAboveCap {
                testnet: name.clone(),
                amount: testnet.amount_to_send,
                cap: testnet.daily_cap,
            });
        }

        if testnet.faucet_address.trim().is_empty() {
            errors.push(ValidationError::MissingFaucetAddress {
                testnet: name.clone(),
            });
        }

        if url::Url::parse(&testnet.node_url).is_err() {
            errors.push(ValidationError::InvalidNodeUrl {
                testnet: name.clone(),
                url: testnet.node_url.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
