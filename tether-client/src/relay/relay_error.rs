use tether_core::RoomId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("relay protocol violation: {0}")]
    Protocol(String),

    #[error("already joined room {0}")]
    AlreadyJoined(RoomId),

    #[error("relay connection closed")]
    Closed,
}
