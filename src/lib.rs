//! Testnet token faucet library.

pub mod admin;
pub mod config;
pub mod faucet;
pub mod http;
pub mod lifecycle;
pub mod node;
pub mod observability;

pub use config::schema::FaucetConfig;
pub use faucet::{Faucet, FaucetError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
