//! Pronto Pizza service binary.
//!
//! Boots the ordering backend: loads configuration from the environment,
//! seeds the bootstrap admin account, and serves the HTTP API until a
//! shutdown signal arrives.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pronto_service::config::ServiceConfig;
use pronto_service::factory::HttpFactory;
use pronto_service::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = ServiceConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pronto_service=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build the factory client and application state
    let factory = HttpFactory::new(&config.factory).expect("Failed to build factory client");
    let state = AppState::new(config.clone(), Arc::new(factory));

    // Create the bootstrap admin account
    state.seed_admin().expect("Failed to seed admin account");

    let app = pronto_service::app(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
