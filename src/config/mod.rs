//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FaucetConfig (validated, immutable)
//!     → NetworkRegistry / NodeCli / HttpServer built from it at startup
//! ```
//!
//! # Design Decisions
//! - Config is loaded once; tallies and cooldowns live in the admission engine
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::AdminConfig;
pub use schema::CosmosConfig;
pub use schema::FaucetConfig;
pub use schema::ListenerConfig;
pub use schema::NodeConfig;
pub use schema::ObservabilityConfig;
pub use schema::TestnetConfig;
