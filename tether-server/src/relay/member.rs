use crate::room::{RoomCommand, RoomManager};
use tether_core::{PeerId, RelayFrame, RelayRequest};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Drives one relay connection: waits for `Join`, registers the connection
/// with its room and forwards every later request. Returns once the request
/// stream ends or the client leaves; the room is always told about it and
/// the membership released.
///
/// Transport-agnostic, so the websocket handler and in-process connectors
/// share it.
pub async fn run_member(
    rooms: RoomManager,
    mut requests: mpsc::UnboundedReceiver<RelayRequest>,
    frames: mpsc::UnboundedSender<RelayFrame>,
) -> Option<PeerId> {
    let (room_id, presence) = match requests.recv().await? {
        RelayRequest::Join { room, presence } => (room, presence),
        other => {
            warn!("First relay request must be Join, got {:?}", other);
            return None;
        }
    };

    let peer_id = PeerId::new();
    let room_tx = rooms.acquire_room(&room_id);

    let join = RoomCommand::Join {
        peer_id,
        presence,
        frames,
    };
    if room_tx.send(join).await.is_err() {
        warn!(room = %room_id, "Room is gone, refusing join");
        rooms.release_room(&room_id);
        return None;
    }
    info!(room = %room_id, %peer_id, "Relay member attached");

    while let Some(request) = requests.recv().await {
        match request {
            RelayRequest::Broadcast { event } => {
                if room_tx
                    .send(RoomCommand::Broadcast { peer_id, event })
                    .await
                    .is_err()
                {
                    break;
                }
            }
            RelayRequest::Leave => break,
            RelayRequest::Join { .. } => {
                debug!(%peer_id, "Repeated join ignored");
            }
        }
    }

    let _ = room_tx.send(RoomCommand::Leave { peer_id }).await;
    rooms.release_room(&room_id);
    info!(room = %room_id, %peer_id, "Relay member detached");

    Some(peer_id)
}
