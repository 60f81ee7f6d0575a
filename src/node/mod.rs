//! Node adapter subsystem.
//!
//! # Data Flow
//! ```text
//! Faucet service
//!     → adapter.rs (NodeAdapter capability: validate, balances, send)
//!     → cli.rs (NodeCli: spawn binary with deadline, parse JSON output)
//!     → types.rs (Coin, TransferRequest, NodeError)
//! ```
//!
//! # Constraints
//! - The faucet never touches chain state directly
//! - Every invocation has a deadline; a hung binary is killed
//! - Failures surface the binary's first stderr line verbatim

pub mod adapter;
pub mod cli;
pub mod types;

pub use adapter::NodeAdapter;
pub use cli::NodeCli;
pub use types::{Coin, NodeError, NodeResult, TransferRequest};
