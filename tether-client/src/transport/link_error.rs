use crate::transport::LinkState;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("webrtc error: {0}")]
    Webrtc(#[from] webrtc::Error),

    #[error("cannot {op} while link is {state}")]
    InvalidState { op: &'static str, state: LinkState },

    #[error("link is closed")]
    Closed,

    #[error("malformed ICE candidate: {0}")]
    Candidate(#[from] serde_json::Error),
}
