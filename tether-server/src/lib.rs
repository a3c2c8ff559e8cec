pub mod config;
pub mod relay;
pub mod room;

pub use config::*;
pub use relay::*;
pub use room::*;

use axum::{Router, routing::get};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("relay server stopped: {0}")]
    Serve(#[from] std::io::Error),
}

/// `/relay` speaks the presence protocol, `/health` answers `ok`.
pub fn router(service: RelayService) -> Router {
    Router::new()
        .route("/relay", get(ws_handler))
        .route("/health", get(|| async { "ok" }))
        .with_state(service)
}

pub async fn serve(config: RelayServerConfig) -> Result<(), ServeError> {
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: config.bind_addr,
            source,
        })?;
    serve_on(listener, &config).await
}

/// Serves on an already bound listener.
pub async fn serve_on(listener: TcpListener, config: &RelayServerConfig) -> Result<(), ServeError> {
    if let Ok(addr) = listener.local_addr() {
        info!("Relay server listening on ws://{}/relay", addr);
    }
    axum::serve(listener, router(RelayService::new(config))).await?;
    Ok(())
}
