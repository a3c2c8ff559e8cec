use crate::relay::{RelayConnector, RelayError, RelaySocket};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tether_core::{PeerId, Presence, RelayFrame, RelayRequest, RoomId, SignalingMessage};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Membership as seen from this endpoint. Lives from a successful join until
/// leave.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub self_peer_id: PeerId,
    pub remote_peer_ids: HashSet<PeerId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresenceEvent {
    Enter { peer_id: PeerId, presence: Presence },
    Leave { peer_id: PeerId },
}

/// A decoded relay event together with the connection that sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayEnvelope {
    pub from: PeerId,
    pub message: SignalingMessage,
}

/// What `join` hands back: one queue per event family. Both close when the
/// relay connection ends or `leave` is called.
pub struct RelaySubscription {
    pub presence: mpsc::UnboundedReceiver<PresenceEvent>,
    pub events: mpsc::UnboundedReceiver<RelayEnvelope>,
}

struct Joined {
    room: Arc<Mutex<Room>>,
    outbound: mpsc::UnboundedSender<RelayRequest>,
    pump: JoinHandle<()>,
}

/// Out-of-band channel to the remote endpoint through a hosted relay room.
pub struct RelayChannel {
    connector: Arc<dyn RelayConnector>,
    joined: Option<Joined>,
}

impl RelayChannel {
    pub fn new(connector: Arc<dyn RelayConnector>) -> Self {
        Self {
            connector,
            joined: None,
        }
    }

    /// Joins `room_id` announcing `presence`. Members already in the room are
    /// reported as `Enter` events before anything else.
    pub async fn join(
        &mut self,
        room_id: RoomId,
        presence: Presence,
    ) -> Result<RelaySubscription, RelayError> {
        if let Some(joined) = &self.joined {
            return Err(RelayError::AlreadyJoined(lock(&joined.room).id.clone()));
        }

        let RelaySocket {
            outbound,
            mut inbound,
        } = self.connector.open().await?;

        outbound
            .send(RelayRequest::Join {
                room: room_id.clone(),
                presence: presence.to_value(),
            })
            .map_err(|_| RelayError::Closed)?;

        let (self_peer_id, others) = match inbound.recv().await {
            Some(RelayFrame::Welcome {
                connection_id,
                others,
            }) => (connection_id, others),
            Some(other) => {
                return Err(RelayError::Protocol(format!(
                    "expected welcome, got {:?}",
                    other
                )));
            }
            None => return Err(RelayError::Closed),
        };

        let (presence_tx, presence_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let mut room = Room {
            id: room_id,
            self_peer_id,
            remote_peer_ids: HashSet::new(),
        };
        for member in others {
            if member.connection_id == self_peer_id {
                continue;
            }
            room.remote_peer_ids.insert(member.connection_id);
            let _ = presence_tx.send(PresenceEvent::Enter {
                peer_id: member.connection_id,
                presence: Presence::from_value(&member.presence),
            });
        }
        info!(
            room = %room.id,
            %self_peer_id,
            present = room.remote_peer_ids.len(),
            "Joined relay room"
        );

        let room = Arc::new(Mutex::new(room));
        let pump = tokio::spawn(pump_frames(inbound, room.clone(), presence_tx, event_tx));

        self.joined = Some(Joined {
            room,
            outbound,
            pump,
        });

        Ok(RelaySubscription {
            presence: presence_rx,
            events: event_rx,
        })
    }

    /// Best-effort broadcast to every other member. Returns whether the
    /// message was handed to the relay connection; never fails.
    pub fn broadcast(&self, message: &SignalingMessage) -> bool {
        let Some(joined) = &self.joined else {
            debug!("Broadcast of {} skipped: not joined", message.kind());
            return false;
        };

        let event = match serde_json::to_value(message) {
            Ok(event) => event,
            Err(e) => {
                warn!("Failed to serialize {}: {}", message.kind(), e);
                return false;
            }
        };

        joined
            .outbound
            .send(RelayRequest::Broadcast { event })
            .is_ok()
    }

    /// Leaves the room. Calling it again, or without ever joining, does
    /// nothing.
    pub fn leave(&mut self) {
        let Some(joined) = self.joined.take() else {
            return;
        };

        let _ = joined.outbound.send(RelayRequest::Leave);
        joined.pump.abort();
        info!(room = %lock(&joined.room).id, "Left relay room");
    }

    pub fn is_joined(&self) -> bool {
        self.joined.is_some()
    }

    /// Snapshot of the current membership, if joined.
    pub fn room(&self) -> Option<Room> {
        self.joined.as_ref().map(|joined| lock(&joined.room).clone())
    }

    pub fn self_peer_id(&self) -> Option<PeerId> {
        self.joined
            .as_ref()
            .map(|joined| lock(&joined.room).self_peer_id)
    }
}

impl Drop for RelayChannel {
    fn drop(&mut self) {
        self.leave();
    }
}

fn lock(room: &Mutex<Room>) -> MutexGuard<'_, Room> {
    room.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn pump_frames(
    mut inbound: mpsc::UnboundedReceiver<RelayFrame>,
    room: Arc<Mutex<Room>>,
    presence_tx: mpsc::UnboundedSender<PresenceEvent>,
    event_tx: mpsc::UnboundedSender<RelayEnvelope>,
) {
    let self_peer_id = lock(&room).self_peer_id;

    while let Some(frame) = inbound.recv().await {
        let delivered = match frame {
            RelayFrame::PresenceEnter {
                connection_id,
                presence,
            } => {
                if connection_id == self_peer_id {
                    debug!("Own presence echo filtered");
                    continue;
                }
                lock(&room).remote_peer_ids.insert(connection_id);
                presence_tx
                    .send(PresenceEvent::Enter {
                        peer_id: connection_id,
                        presence: Presence::from_value(&presence),
                    })
                    .is_ok()
            }

            RelayFrame::PresenceLeave { connection_id } => {
                if connection_id == self_peer_id {
                    continue;
                }
                lock(&room).remote_peer_ids.remove(&connection_id);
                presence_tx
                    .send(PresenceEvent::Leave {
                        peer_id: connection_id,
                    })
                    .is_ok()
            }

            RelayFrame::Event { from, event } => {
                if from == self_peer_id {
                    continue;
                }
                match serde_json::from_value::<SignalingMessage>(event) {
                    Ok(message) => event_tx.send(RelayEnvelope { from, message }).is_ok(),
                    Err(e) => {
                        warn!(%from, "Malformed relay event dropped: {}", e);
                        true
                    }
                }
            }

            RelayFrame::Welcome { .. } => {
                debug!("Unexpected second welcome ignored");
                true
            }
        };

        if !delivered {
            break;
        }
    }

    debug!("Relay frame pump finished");
}
