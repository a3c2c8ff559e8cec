use std::fmt;
use tether_core::PeerId;

/// What the endpoint can currently reach, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Joining the relay.
    Connecting,
    /// The relay could not be joined or was lost. Not retried.
    Offline,
    /// Joined; updates travel over the relay.
    RelayOnly,
    /// The data channel is open.
    Direct,
    /// Another endpoint with our role is in the room.
    RoleConflict { peer: PeerId },
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Connecting => write!(f, "connecting"),
            SessionStatus::Offline => write!(f, "offline"),
            SessionStatus::RelayOnly => write!(f, "relay only"),
            SessionStatus::Direct => write!(f, "direct"),
            SessionStatus::RoleConflict { peer } => write!(f, "role conflict with {}", peer),
        }
    }
}
