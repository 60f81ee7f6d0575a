//! Faucet core: network registry, admission engine, transaction log.
//!
//! # Data Flow
//! ```text
//! config.testnets
//!     → registry.rs (static Network descriptions)
//!     → admission.rs (per-network ledger: daily_cap.rs + cooldown.rs)
//!     → service.rs (validate → admit → transfer → rollback | record)
//!     → recorder.rs (append-only CSV)
//! ```
//!
//! # Design Decisions
//! - Limits are in-memory and reset on restart
//! - Cap is charged before the cooldown is checked; a cooldown rejection refunds it
//! - Cooldown entries are installed before the transfer and act as per-address locks
//! - A failed transfer leaves both limits exactly as they were

pub mod admission;
pub mod clock;
pub mod cooldown;
pub mod daily_cap;
pub mod error;
pub mod recorder;
pub mod registry;
pub mod service;

pub use admission::{AdmissionEngine, NetworkUsage, Reservation};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{FaucetError, FaucetResult};
pub use recorder::{TransactionRecord, TransactionRecorder};
pub use registry::{Network, NetworkRegistry};
pub use service::{Disbursement, Faucet};
