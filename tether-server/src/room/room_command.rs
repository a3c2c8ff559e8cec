use serde_json::Value;
use tether_core::{PeerId, RelayFrame};
use tokio::sync::mpsc;

/// Commands a room actor receives from member connections.
#[derive(Debug)]
pub enum RoomCommand {
    /// A connection joined; `frames` is its outbound queue.
    Join {
        peer_id: PeerId,
        presence: Value,
        frames: mpsc::UnboundedSender<RelayFrame>,
    },

    /// Arbitrary event to fan out to everyone but the sender.
    Broadcast { peer_id: PeerId, event: Value },

    /// Explicit leave or closed socket.
    Leave { peer_id: PeerId },
}
