//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::{
    handler::{
        connection::handle_socket,
        http::{get_lobby, health_check},
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Line-based TCP chat server
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(AppState::new(repository, message_pusher, formatter));
/// Server::new(state, ServerConfig::default()).run().await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    config: ServerConfig,
}

impl Server {
    pub fn new(state: Arc<AppState>, config: ServerConfig) -> Self {
        Self { state, config }
    }

    /// Bind the configured ports and serve until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if either listener fails to bind.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;

        if let Some(http_addr) = self.config.http_bind_addr() {
            let http_listener = TcpListener::bind(&http_addr).await?;
            tracing::info!("Status API listening on {}", http_listener.local_addr()?);
            let app = status_router(self.state.clone());
            tokio::spawn(async move {
                if let Err(e) = axum::serve(http_listener, app)
                    .with_graceful_shutdown(shutdown_signal())
                    .await
                {
                    tracing::error!("Status API error: {}", e);
                }
            });
        }

        self.serve(listener, shutdown_signal()).await?;
        Ok(())
    }

    /// Accept chat connections on `listener` until `shutdown` resolves.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()>,
    ) -> std::io::Result<()> {
        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        tokio::spawn(handle_socket(
                            stream,
                            peer,
                            self.state.clone(),
                            self.config.max_line_length,
                        ));
                    }
                    Err(e) => tracing::warn!("Failed to accept connection: {}", e),
                },
            }
        }

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Router for the read-only status API
pub fn status_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/lobby", get(get_lobby))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
