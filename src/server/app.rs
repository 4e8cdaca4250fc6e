//! Application server
//!
//! Startup and graceful shutdown.

use crate::{
    config::Settings,
    server::{routes, state::AppState},
};
use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;

pub struct App {
    settings: Settings,
    state: AppState,
}

impl App {
    /// Validate settings and build the shared state
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;

        tracing::debug!("Initializing application state");
        let state = AppState::new(settings.clone())?;

        Ok(Self { settings, state })
    }

    /// Serve until SIGINT or SIGTERM, letting in-flight requests finish
    pub async fn run_with_graceful_shutdown(self) -> Result<()> {
        let addr = self.settings.server_addr().parse::<SocketAddr>()?;
        let router = routes::create_router(self.state.clone());

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(address = %addr, "Listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!(
            uptime_seconds = self.state.uptime_seconds(),
            "Server stopped"
        );

        Ok(())
    }
}

/// Completes when a shutdown signal arrives
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
