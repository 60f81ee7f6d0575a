//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the faucet handlers
//! - Mount the admin surface when enabled
//! - Wire up middleware (tracing, timeout, request ID, CORS)
//! - Serve until the shutdown signal fires

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::setup_admin_router;
use crate::config::FaucetConfig;
use crate::faucet::Faucet;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub faucet: Arc<Faucet>,
    pub config: Arc<FaucetConfig>,
}

/// HTTP server for the faucet.
pub struct HttpServer {
    router: Router,
    config: Arc<FaucetConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: FaucetConfig, faucet: Arc<Faucet>) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            faucet,
            config: config.clone(),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &FaucetConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/balance", get(handlers::get_balance))
            .route("/request", get(handlers::request_tokens))
            .route("/health", get(handlers::health))
            .with_state(state.clone());

        if config.admin.enabled {
            router = router.merge(setup_admin_router(state));
        }

        // Outermost first: the id is assigned before the trace span opens.
        let mut router = router.layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer())
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        );

        if config.http.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        router
    }

    /// The fully layered router, for serving elsewhere or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            testnets = ?self.config.testnets.keys().collect::<Vec<_>>(),
            admin = self.config.admin.enabled,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &FaucetConfig {
        &self.config
    }
}
