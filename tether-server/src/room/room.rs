use serde_json::Value;
use std::collections::HashMap;
use tether_core::{Member, PeerId, RelayFrame, RoomId};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::room::room_command::RoomCommand;

struct MemberSlot {
    presence: Value,
    frames: mpsc::UnboundedSender<RelayFrame>,
}

/// Room actor. Owns the member table and is the only writer to it; every
/// frame a member sees is produced here, so per-sender order is the order the
/// commands were received.
pub struct Room {
    room_id: RoomId,
    members: HashMap<PeerId, MemberSlot>,
    command_rx: mpsc::Receiver<RoomCommand>,
}

impl Room {
    pub fn new(room_id: RoomId, command_rx: mpsc::Receiver<RoomCommand>) -> Self {
        Self {
            room_id,
            members: HashMap::new(),
            command_rx,
        }
    }

    /// Event loop. Runs until every command sender is dropped.
    pub async fn run(mut self) {
        info!(room = %self.room_id, "Room event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }

        info!(room = %self.room_id, "Room event loop finished");
    }

    fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join {
                peer_id,
                presence,
                frames,
            } => {
                if self.members.contains_key(&peer_id) {
                    warn!(room = %self.room_id, %peer_id, "Duplicate join ignored");
                    return;
                }

                let others = self
                    .members
                    .iter()
                    .map(|(id, slot)| Member {
                        connection_id: *id,
                        presence: slot.presence.clone(),
                    })
                    .collect();

                let _ = frames.send(RelayFrame::Welcome {
                    connection_id: peer_id,
                    others,
                });

                self.members.insert(
                    peer_id,
                    MemberSlot {
                        presence: presence.clone(),
                        frames,
                    },
                );
                info!(room = %self.room_id, %peer_id, members = self.members.len(), "Member joined");

                // The joiner gets its own enter too, like any hosted presence
                // service would; clients filter it by connection id.
                self.fan_out(
                    RelayFrame::PresenceEnter {
                        connection_id: peer_id,
                        presence,
                    },
                    None,
                );
            }

            RoomCommand::Broadcast { peer_id, event } => {
                if !self.members.contains_key(&peer_id) {
                    debug!(room = %self.room_id, %peer_id, "Broadcast from non-member dropped");
                    return;
                }
                self.fan_out(
                    RelayFrame::Event {
                        from: peer_id,
                        event,
                    },
                    Some(&peer_id),
                );
            }

            RoomCommand::Leave { peer_id } => {
                if self.members.remove(&peer_id).is_none() {
                    return;
                }
                info!(room = %self.room_id, %peer_id, members = self.members.len(), "Member left");
                self.fan_out(
                    RelayFrame::PresenceLeave {
                        connection_id: peer_id,
                    },
                    None,
                );
            }
        }
    }

    fn fan_out(&mut self, frame: RelayFrame, skip: Option<&PeerId>) {
        let mut gone = Vec::new();

        for (id, slot) in &self.members {
            if Some(id) == skip {
                continue;
            }
            if slot.frames.send(frame.clone()).is_err() {
                gone.push(*id);
            }
        }

        // A closed queue means the connection task is gone without having sent
        // Leave yet; treat it as a leave now.
        for id in gone {
            warn!(room = %self.room_id, peer_id = %id, "Member queue closed, dropping member");
            self.handle_command(RoomCommand::Leave { peer_id: id });
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
