//! Testnet token faucet.
//!
//! # Architecture Overview
//!
//! ```text
//!     GET /balance ─┐      ┌──────────────────────────────────────────────┐
//!     GET /request ─┼─────▶│ http (axum)                                   │
//!                   │      │   └─▶ faucet::Faucet                          │
//!                   │      │         ├─▶ registry   (static testnets)      │
//!                   │      │         ├─▶ admission  (daily cap, cooldown)  │──▶ node binary
//!                   │      │         ├─▶ node       (validate/balance/send)│    (e.g. gaiad)
//!                   │      │         └─▶ recorder   (transactions.csv)     │
//!                   │      │                                              │
//!     GET /admin/* ─┘      │ config · observability · lifecycle           │
//!                          └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use testnet_faucet::config::load_config;
use testnet_faucet::lifecycle::{build_faucet, signals, Shutdown};
use testnet_faucet::observability::{logging, metrics};
use testnet_faucet::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "testnet-faucet", version, about = "Token faucet for blockchain test networks")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override listener.bind_address
    #[arg(long)]
    bind: Option<String>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config(&args.config)?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if args.debug {
        config.observability.log_level = "debug".to_string();
    }

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "testnet-faucet starting");
    tracing::info!(
        config = %args.config.display(),
        bind_address = %config.listener.bind_address,
        cooldown_secs = config.cooldown_secs,
        node_binary = %config.node.binary,
        transactions_log = %config.transactions_log,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let faucet = Arc::new(build_faucet(&config));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    // Elapsed cooldown entries are only needed until the next request from the
    // same address; sweep them so idle addresses do not accumulate.
    let sweeper = {
        let faucet = faucet.clone();
        let mut stop = shutdown.subscribe();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(std::time::Duration::from_secs(3600));
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let purged = faucet.engine().purge_expired();
                        if purged > 0 {
                            tracing::debug!(purged, "Purged expired cooldown entries");
                        }
                    }
                    _ = stop.recv() => break,
                }
            }
        })
    };

    let server = HttpServer::new(config, faucet);
    let server_task = tokio::spawn(server.run(listener, server_shutdown));

    signals::wait_for_signal().await;
    shutdown.trigger();

    server_task.await??;
    let _ = sweeper.await;

    tracing::info!("Shutdown complete");
    Ok(())
}
