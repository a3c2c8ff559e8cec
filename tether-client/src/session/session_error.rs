use crate::bridge::BridgeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to set up peer link: {0}")]
    Setup(#[from] BridgeError),

    #[error("session has stopped")]
    Stopped,
}
