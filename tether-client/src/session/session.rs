use crate::bridge::{BridgeError, SignalingBridge};
use crate::relay::{PresenceEvent, RelayChannel, RelayConnector, RelayEnvelope};
use crate::session::{SessionCommand, SessionConfig, SessionError, SessionHandle, SessionStatus};
use crate::sync::{SyncManager, decode_message};
use crate::transport::LinkEvent;
use std::sync::Arc;
use tether_core::{ControlState, PeerId, Presence, RoomId, SignalingMessage};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

const COMMAND_CAPACITY: usize = 64;
const LINK_EVENT_CAPACITY: usize = 100;

/// The per-endpoint event loop. Owns the relay channel, the signaling bridge
/// (and through it the peer link) and the sync manager; nothing else touches
/// them.
pub struct Session {
    room_id: RoomId,
    relay: RelayChannel,
    bridge: SignalingBridge,
    sync: SyncManager,
    link_rx: mpsc::Receiver<LinkEvent>,
    command_rx: mpsc::Receiver<SessionCommand>,
    status_tx: watch::Sender<SessionStatus>,
    relay_alive: bool,
    conflicts: Vec<PeerId>,
}

impl Session {
    /// Builds the session and starts its task. The relay join happens inside
    /// the task; a failed join is reported through the status, not here.
    pub async fn spawn(
        config: SessionConfig,
        connector: Arc<dyn RelayConnector>,
    ) -> Result<SessionHandle, SessionError> {
        let (link_tx, link_rx) = mpsc::channel(LINK_EVENT_CAPACITY);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (status_tx, status) = watch::channel(SessionStatus::Connecting);

        let bridge = SignalingBridge::new(config.role, config.transport, link_tx).await?;
        let sync = SyncManager::new(ControlState::default());
        let controls = sync.subscribe();

        let session = Session {
            room_id: config.room_id,
            relay: RelayChannel::new(connector),
            bridge,
            sync,
            link_rx,
            command_rx,
            status_tx,
            relay_alive: false,
            conflicts: Vec::new(),
        };
        let task = tokio::spawn(session.run());

        Ok(SessionHandle {
            command_tx,
            controls,
            status,
            task,
        })
    }

    async fn run(mut self) {
        let role = self.bridge.role();
        info!(room = %self.room_id, %role, "Session started");

        let (mut presence_rx, mut events_rx) = match self
            .relay
            .join(self.room_id.clone(), Presence::with_role(role))
            .await
        {
            Ok(subscription) => {
                self.relay_alive = true;
                (Some(subscription.presence), Some(subscription.events))
            }
            Err(e) => {
                error!(room = %self.room_id, "Relay join failed: {}", e);
                (None, None)
            }
        };
        self.refresh_status().await;

        loop {
            tokio::select! {
                event = recv_opt(&mut presence_rx) => match event {
                    Some(event) => self.on_presence(event).await,
                    None => {
                        presence_rx = None;
                        self.on_relay_lost().await;
                    }
                },

                envelope = recv_opt(&mut events_rx) => match envelope {
                    Some(envelope) => self.on_envelope(envelope).await,
                    None => {
                        events_rx = None;
                        self.on_relay_lost().await;
                    }
                },

                Some(event) = self.link_rx.recv() => self.on_link_event(event).await,

                cmd = self.command_rx.recv() => match cmd {
                    Some(SessionCommand::SetLocal { patch, reply }) => {
                        let route = self
                            .sync
                            .set_local(patch, self.bridge.link(), &self.relay)
                            .await;
                        debug!(?route, "Local controls sent");
                        let _ = reply.send(route);
                    }
                    Some(SessionCommand::Shutdown { done }) => {
                        self.teardown().await;
                        let _ = done.send(());
                        return;
                    }
                    None => break,
                },
            }
        }

        self.teardown().await;
    }

    async fn on_presence(&mut self, event: PresenceEvent) {
        if let PresenceEvent::Leave { peer_id } = &event
            && let Some(pos) = self.conflicts.iter().position(|id| id == peer_id)
        {
            self.conflicts.remove(pos);
            info!(%peer_id, remaining = self.conflicts.len(), "Conflicting peer left");
        }

        match self.bridge.handle_presence(&self.relay, event).await {
            Ok(()) => {}
            Err(BridgeError::RoleConflict { peer, role }) => {
                warn!(%peer, %role, "Two endpoints with the same role in one room");
                if !self.conflicts.contains(&peer) {
                    self.conflicts.push(peer);
                }
            }
            Err(e) => warn!("Presence handling failed: {}", e),
        }
        self.refresh_status().await;
    }

    async fn on_envelope(&mut self, envelope: RelayEnvelope) {
        let RelayEnvelope { from, message } = envelope;

        if let SignalingMessage::ControlsUpdate { .. } = &message {
            debug!(%from, "Controls update over relay");
            self.sync.on_remote_update(&message);
            return;
        }

        let kind = message.kind();
        if let Err(e) = self.bridge.handle_signal(&self.relay, from, message).await {
            warn!(%from, "Dropping {}: {}", kind, e);
        }
    }

    async fn on_link_event(&mut self, event: LinkEvent) {
        if !self.bridge.is_current(&event) {
            debug!(link = event.link_id(), "Event from replaced link ignored");
            return;
        }

        match event {
            LinkEvent::CandidateGenerated(_, candidate) => {
                self.bridge.forward_candidate(&self.relay, candidate);
            }
            LinkEvent::ChannelOpen(_) | LinkEvent::ChannelClosed(_) => {
                self.refresh_status().await;
            }
            LinkEvent::Message(_, payload) => match decode_message(&payload) {
                Ok(message) => {
                    if !self.sync.on_remote_update(&message) {
                        warn!("Unexpected {} on data channel dropped", message.kind());
                    }
                }
                Err(e) => warn!("Malformed data channel message dropped: {}", e),
            },
        }
    }

    async fn on_relay_lost(&mut self) {
        if self.relay_alive {
            warn!(room = %self.room_id, "Relay connection lost");
            self.relay_alive = false;
            self.relay.leave();
        }
        self.refresh_status().await;
    }

    async fn refresh_status(&mut self) {
        // The oldest conflict is reported until every conflicting peer is gone.
        let status = if let Some(&peer) = self.conflicts.first() {
            SessionStatus::RoleConflict { peer }
        } else if self.bridge.link().is_open().await {
            SessionStatus::Direct
        } else if self.relay_alive {
            SessionStatus::RelayOnly
        } else {
            SessionStatus::Offline
        };

        let changed = self.status_tx.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
        if changed {
            info!(%status, "Session status changed");
        }
    }

    async fn teardown(&mut self) {
        self.relay.leave();
        self.relay_alive = false;
        if let Err(e) = self.bridge.close().await {
            warn!("Closing peer link failed: {}", e);
        }
        self.command_rx.close();
        info!(room = %self.room_id, "Session stopped");
    }
}

async fn recv_opt<T>(rx: &mut Option<mpsc::UnboundedReceiver<T>>) -> Option<T> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
