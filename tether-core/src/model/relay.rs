use crate::model::peer::PeerId;
use crate::model::role::Role;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client -> relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum RelayRequest {
    /// Must be the first request on a connection.
    Join { room: RoomId, presence: Value },
    Broadcast { event: Value },
    Leave,
}

/// Relay -> client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum RelayFrame {
    /// Reply to `Join`: our own connection id plus everyone already present.
    Welcome {
        connection_id: PeerId,
        others: Vec<Member>,
    },
    /// Fanned out to every member, the joiner included.
    PresenceEnter {
        connection_id: PeerId,
        presence: Value,
    },
    PresenceLeave { connection_id: PeerId },
    /// Never delivered back to its sender.
    Event { from: PeerId, event: Value },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub connection_id: PeerId,
    pub presence: Value,
}

/// What an endpoint announces about itself when joining a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Presence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Presence {
    pub fn with_role(role: Role) -> Self {
        Self { role: Some(role) }
    }

    /// Lenient decoding: presence from foreign clients may carry anything.
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    pub fn to_value(self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
