//! Request admission: daily cap and cooldown governance.
//!
//! # Algorithm
//! ```text
//! admit(network, address):
//!     lock ledger(network)
//!     charge day tally          → DailyCapReached (nothing mutated)
//!     reserve cooldown entry    → refund tally, CooldownActive
//!     unlock, return Reservation
//!
//! release(reservation):          (transfer failed)
//!     lock ledger(network)
//!     drop the cooldown entry it installed, refund its charge
//! ```
//!
//! The ledger guard is held only across the synchronous steps, never across
//! the transfer, so requests for different networks never contend and the
//! cap cannot be oversubscribed between check and transfer.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;

use crate::faucet::clock::Clock;
use crate::faucet::cooldown::{format_wait, CooldownBook};
use crate::faucet::daily_cap::DayTally;
use crate::faucet::error::{FaucetError, FaucetResult};
use crate::faucet::registry::{Network, NetworkRegistry};
use crate::observability::metrics;

/// Mutable limits of one network.
#[derive(Debug)]
struct NetworkLedger {
    tally: DayTally,
    cooldowns: CooldownBook,
}

impl NetworkLedger {
    fn new(today: NaiveDate) -> Self {
        Self {
            tally: DayTally::new(today),
            cooldowns: CooldownBook::new(),
        }
    }
}

/// Proof that a request passed admission. Hand it back to
/// [`AdmissionEngine::release`] if the transfer fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub network: String,
    pub address: String,
    pub amount: u64,
    pub day: NaiveDate,
    pub next_allowed: DateTime<Utc>,
}

/// Snapshot of a network's limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkUsage {
    pub active_day: NaiveDate,
    pub day_tally: u64,
    pub active_cooldowns: usize,
}

pub struct AdmissionEngine {
    ledgers: DashMap<String, NetworkLedger>,
    cooldown: Duration,
    clock: Arc<dyn Clock>,
}

impl AdmissionEngine {
    pub fn new(registry: &NetworkRegistry, cooldown: std::time::Duration, clock: Arc<dyn Clock>) -> Self {
        let today = clock.today();
        let ledgers = DashMap::new();
        for network in registry.iter() {
            ledgers.insert(network.name.clone(), NetworkLedger::new(today));
        }

        Self {
            ledgers,
            cooldown: Duration::from_std(cooldown).unwrap_or_else(|_| Duration::days(36_500)),
            clock,
        }
    }

    pub fn cooldown_hours(&self) -> u64 {
        (self.cooldown.num_seconds() / 3600).max(0) as u64
    }

    /// Charge the daily cap and lock the address, or reject.
    pub fn admit(&self, network: &Network, address: &str) -> FaucetResult<Reservation> {
        let now = self.clock.now();
        let today = now.date_naive();
        let delta = network.amount_to_send;

        let mut ledger = self
            .ledgers
            .entry(network.name.clone())
            .or_insert_with(|| NetworkLedger::new(today));

        if !ledger.tally.charge(today, delta, network.daily_cap) {
            tracing::info!(
                chain = %network.name,
                address = %address,
                day_tally = ledger.tally.tally(),
                daily_cap = network.daily_cap,
                "Request rejected: daily cap reached"
            );
            metrics::record_rejection(&network.name, "daily_cap");
            return Err(FaucetError::DailyCapReached);
        }

        match ledger.cooldowns.reserve(address, now, self.cooldown) {
            Ok(next_allowed) => {
                metrics::record_day_tally(&network.name, ledger.tally.tally());
                tracing::debug!(
                    chain = %network.name,
                    address = %address,
                    day_tally = ledger.tally.tally(),
                    next_allowed = %next_allowed,
                    "Request admitted"
                );
                Ok(Reservation {
                    network: network.name.clone(),
                    address: address.to_string(),
                    amount: delta,
                    day: today,
                    next_allowed,
                })
            }
            Err(remaining) => {
                ledger.tally.refund(today, delta);
                let wait = format_wait(remaining);
                tracing::info!(
                    chain = %network.name,
                    address = %address,
                    wait = %wait,
                    "Request rejected: address cooling down"
                );
                metrics::record_rejection(&network.name, "cooldown");
                Err(FaucetError::CooldownActive {
                    wait,
                    window_hours: self.cooldown_hours(),
                })
            }
        }
    }

    /// Undo both mutations of `admit` after a failed transfer.
    pub fn release(&self, reservation: &Reservation) {
        let Some(mut ledger) = self.ledgers.get_mut(&reservation.network) else {
            return;
        };

        let unlocked = ledger
            .cooldowns
            .release(&reservation.address, reservation.next_allowed);
        let refunded = ledger.tally.refund(reservation.day, reservation.amount);

        metrics::record_rollback(&reservation.network);
        metrics::record_day_tally(&reservation.network, ledger.tally.tally());
        tracing::warn!(
            chain = %reservation.network,
            address = %reservation.address,
            unlocked,
            refunded,
            day_tally = ledger.tally.tally(),
            "Admission rolled back"
        );
    }

    pub fn usage(&self, network: &str) -> Option<NetworkUsage> {
        let now = self.clock.now();
        self.ledgers.get(network).map(|ledger| NetworkUsage {
            active_day: ledger.tally.active_day(),
            day_tally: ledger.tally.tally(),
            active_cooldowns: ledger.cooldowns.active(now),
        })
    }

    /// Whether `address` currently holds a cooldown entry on `network`.
    pub fn is_locked(&self, network: &str, address: &str) -> bool {
        let now = self.clock.now();
        self.ledgers
            .get(network)
            .and_then(|ledger| ledger.cooldowns.next_allowed(address))
            .is_some_and(|t| t > now)
    }

    /// Drop cooldown entries that have elapsed, across all networks.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        self.ledgers
            .iter_mut()
            .map(|mut ledger| ledger.cooldowns.purge_expired(now))
            .sum()
    }
}

impl std::fmt::Debug for AdmissionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionEngine")
            .field("networks", &self.ledgers.len())
            .field("cooldown_secs", &self.cooldown.num_seconds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faucet::clock::ManualClock;
    use chrono::TimeZone;

    fn network(cap: u64, amount: u64) -> Network {
        Network {
            name: "theta-testnet-001".into(),
            chain_id: "theta-testnet-001".into(),
            node_url: "http://127.0.0.1:26657".into(),
            faucet_address: "cosmos1faucet".into(),
            amount_to_send: amount,
            tx_fee: 5,
            daily_cap: cap,
            denom: "uatom".into(),
        }
    }

    fn setup(net: &Network, cooldown_secs: u64) -> (AdmissionEngine, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap(),
        ));
        let registry = NetworkRegistry::new([net.clone()]);
        let engine = AdmissionEngine::new(
            &registry,
            std::time::Duration::from_secs(cooldown_secs),
            clock.clone(),
        );
        (engine, clock)
    }

    fn tally(engine: &AdmissionEngine, net: &Network) -> u64 {
        engine.usage(&net.name).unwrap().day_tally
    }

    #[test]
    fn test_cap_reached_after_ten_requests() {
        let net = network(1000, 100);
        let (engine, _) = setup(&net, 3600);

        for i in 0..10 {
            engine.admit(&net, &format!("cosmos1user{}", i)).unwrap();
        }
        assert_eq!(tally(&engine, &net), 1000);

        let err = engine.admit(&net, "cosmos1user10").unwrap_err();
        assert!(matches!(err, FaucetError::DailyCapReached));
        assert_eq!(tally(&engine, &net), 1000);
        // Cap rejection installs no lock.
        assert!(!engine.is_locked(&net.name, "cosmos1user10"));
    }

    #[test]
    fn test_cooldown_window() {
        let net = network(1000, 100);
        let (engine, clock) = setup(&net, 3600);

        engine.admit(&net, "cosmos1a").unwrap();

        clock.advance(Duration::seconds(1800));
        match engine.admit(&net, "cosmos1a") {
            Err(FaucetError::CooldownActive { wait, window_hours }) => {
                assert_eq!(wait, "30 minutes");
                assert_eq!(window_hours, 1);
            }
            other => panic!("expected cooldown, got {:?}", other),
        }
        // The provisional charge of the rejected request was refunded.
        assert_eq!(tally(&engine, &net), 100);

        clock.advance(Duration::seconds(1801));
        engine.admit(&net, "cosmos1a").unwrap();
        assert_eq!(tally(&engine, &net), 200);
    }

    #[test]
    fn test_second_request_blocked_while_first_in_flight() {
        let net = network(1000, 100);
        let (engine, _) = setup(&net, 3600);

        let _in_flight = engine.admit(&net, "cosmos1a").unwrap();
        let err = engine.admit(&net, "cosmos1a").unwrap_err();
        assert!(matches!(err, FaucetError::CooldownActive { .. }));
        assert_eq!(tally(&engine, &net), 100);
    }

    #[test]
    fn test_release_restores_prior_state() {
        let net = network(1000, 100);
        let (engine, _) = setup(&net, 3600);
        engine.admit(&net, "cosmos1other").unwrap();
        let before = engine.usage(&net.name).unwrap();

        let reservation = engine.admit(&net, "cosmos1a").unwrap();
        engine.release(&reservation);

        assert_eq!(engine.usage(&net.name).unwrap(), before);
        assert!(!engine.is_locked(&net.name, "cosmos1a"));
        // Immediately eligible again.
        assert!(engine.admit(&net, "cosmos1a").is_ok());
    }

    #[test]
    fn test_day_rollover_resets_tally() {
        let net = network(1000, 100);
        let (engine, clock) = setup(&net, 60);

        for i in 0..10 {
            engine.admit(&net, &format!("cosmos1user{}", i)).unwrap();
        }
        assert!(engine.admit(&net, "cosmos1late").is_err());

        clock.advance(Duration::days(1));
        engine.admit(&net, "cosmos1late").unwrap();
        let usage = engine.usage(&net.name).unwrap();
        assert_eq!(usage.day_tally, 100);
        assert_eq!(usage.active_day, clock.today());
    }

    #[test]
    fn test_release_after_rollover_keeps_new_day_tally() {
        let net = network(1000, 100);
        let (engine, clock) = setup(&net, 60);

        let stale = engine.admit(&net, "cosmos1a").unwrap();
        clock.advance(Duration::days(1));
        engine.admit(&net, "cosmos1b").unwrap();

        engine.release(&stale);
        assert_eq!(tally(&engine, &net), 100);
    }

    #[test]
    fn test_purge_expired() {
        let net = network(1000, 100);
        let (engine, clock) = setup(&net, 60);
        engine.admit(&net, "cosmos1a").unwrap();
        engine.admit(&net, "cosmos1b").unwrap();

        clock.advance(Duration::seconds(61));
        assert_eq!(engine.usage(&net.name).unwrap().active_cooldowns, 0);
        assert_eq!(engine.purge_expired(), 2);
    }

    #[test]
    fn test_concurrent_admissions_respect_cap() {
        let net = network(1000, 100);
        let (engine, _) = setup(&net, 3600);
        let engine = Arc::new(engine);

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let engine = engine.clone();
                let net = net.clone();
                std::thread::spawn(move || engine.admit(&net, &format!("cosmos1user{}", i)).is_ok())
            })
            .collect();
        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(admitted, 10);
        assert_eq!(tally(&engine, &net), 1000);
    }
}
