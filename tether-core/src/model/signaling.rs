use crate::model::controls::ControlState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

/// Messages exchanged between controller and receiver, either broadcast over
/// the relay room or sent on the data channel.
///
/// `IceCandidate::candidate` is the JSON encoding of the candidate init
/// (`candidate`, `sdpMid`, `sdpMLineIndex`, `usernameFragment`), carried as an
/// opaque string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SignalingMessage {
    #[serde(rename = "webrtc-offer")]
    Offer {
        #[serde(rename = "offer")]
        sdp: String,
    },
    #[serde(rename = "webrtc-answer")]
    Answer {
        #[serde(rename = "answer")]
        sdp: String,
    },
    #[serde(rename = "webrtc-ice-candidate")]
    IceCandidate { candidate: String },
    #[serde(rename = "controls-update")]
    ControlsUpdate { controls: ControlState },
}

impl SignalingMessage {
    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            SignalingMessage::Offer { .. } => "offer",
            SignalingMessage::Answer { .. } => "answer",
            SignalingMessage::IceCandidate { .. } => "ice-candidate",
            SignalingMessage::ControlsUpdate { .. } => "controls-update",
        }
    }

    pub fn is_handshake(&self) -> bool {
        !matches!(self, SignalingMessage::ControlsUpdate { .. })
    }
}
