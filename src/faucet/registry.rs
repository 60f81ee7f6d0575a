//! Static description of the supported test networks.

use std::collections::BTreeMap;

use crate::config::schema::FaucetConfig;
use crate::faucet::error::{FaucetError, FaucetResult};

/// One test network. Immutable after startup; the mutable tally lives in the
/// admission engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    /// Name clients pass as `chain`.
    pub name: String,
    pub chain_id: String,
    pub node_url: String,
    pub faucet_address: String,
    pub amount_to_send: u64,
    pub tx_fee: u64,
    pub daily_cap: u64,
    pub denom: String,
}

impl Network {
    /// Per-request amount with denomination, e.g. `10000000uatom`.
    pub fn amount_with_denom(&self) -> String {
        format!("{}{}", self.amount_to_send, self.denom)
    }

    pub fn fee_with_denom(&self) -> String {
        format!("{}{}", self.tx_fee, self.denom)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NetworkRegistry {
    networks: BTreeMap<String, Network>,
}

impl NetworkRegistry {
    pub fn new(networks: impl IntoIterator<Item = Network>) -> Self {
        Self {
            networks: networks.into_iter().map(|n| (n.name.clone(), n)).collect(),
        }
    }

    pub fn from_config(config: &FaucetConfig) -> Self {
        Self::new(config.testnets.iter().map(|(name, t)| Network {
            name: name.clone(),
            chain_id: t.chain_id.clone().unwrap_or_else(|| name.clone()),
            node_url: t.node_url.clone(),
            faucet_address: t.faucet_address.clone(),
            amount_to_send: t.amount_to_send,
            tx_fee: t.tx_fees,
            daily_cap: t.daily_cap,
            denom: config.cosmos.denomination.clone(),
        }))
    }

    pub fn get(&self, name: &str) -> FaucetResult<&Network> {
        self.networks
            .get(name)
            .ok_or_else(|| FaucetError::UnknownNetwork {
                chain: name.to_string(),
                valid: self.names(),
            })
    }

    /// Configured network names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.networks.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Network> {
        self.networks.values()
    }
}
