use crate::bridge::BridgeError;
use crate::relay::{PresenceEvent, RelayChannel};
use crate::transport::{LinkEvent, LinkId, LinkState, PeerLink, TransportConfig};
use std::collections::HashSet;
use tether_core::{PeerId, Role, SignalingMessage};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Drives the offer/answer/candidate handshake between the local
/// [`PeerLink`] and the one remote peer it is engaged with.
///
/// The receiver offers, the controller answers. Signaling that does not fit
/// the current state is logged and dropped.
pub struct SignalingBridge {
    role: Role,
    transport: TransportConfig,
    link: PeerLink,
    link_tx: mpsc::Sender<LinkEvent>,
    next_link_id: LinkId,
    remote_peer: Option<PeerId>,
    conflicts: HashSet<PeerId>,
}

impl SignalingBridge {
    pub async fn new(
        role: Role,
        transport: TransportConfig,
        link_tx: mpsc::Sender<LinkEvent>,
    ) -> Result<Self, BridgeError> {
        let link = PeerLink::new(1, &transport, link_tx.clone()).await?;

        Ok(Self {
            role,
            transport,
            link,
            link_tx,
            next_link_id: 2,
            remote_peer: None,
            conflicts: HashSet::new(),
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The link of the current connection attempt.
    pub fn link(&self) -> &PeerLink {
        &self.link
    }

    /// The peer the current link negotiates with, once chosen.
    pub fn remote_peer(&self) -> Option<PeerId> {
        self.remote_peer
    }

    /// Whether `event` comes from the current link rather than a replaced one.
    pub fn is_current(&self, event: &LinkEvent) -> bool {
        event.link_id() == self.link.id()
    }

    pub async fn handle_presence(
        &mut self,
        relay: &RelayChannel,
        event: PresenceEvent,
    ) -> Result<(), BridgeError> {
        match event {
            PresenceEvent::Enter { peer_id, presence } => {
                if presence.role == Some(self.role) {
                    warn!(%peer_id, role = %self.role, "Remote peer announced our own role");
                    self.conflicts.insert(peer_id);
                    return Err(BridgeError::RoleConflict {
                        peer: peer_id,
                        role: self.role,
                    });
                }

                match self.role {
                    Role::Receiver => self.offer_to(relay, peer_id).await,
                    Role::Controller => {
                        debug!(%peer_id, "Peer entered, waiting for its offer");
                        Ok(())
                    }
                }
            }

            PresenceEvent::Leave { peer_id } => {
                self.conflicts.remove(&peer_id);
                if self.remote_peer != Some(peer_id) {
                    return Ok(());
                }

                info!(%peer_id, "Engaged peer left, resetting link");
                self.reset_link().await?;

                if self.role == Role::Receiver {
                    // Someone else may already be waiting in the room.
                    let waiting = relay.room().and_then(|room| {
                        room.remote_peer_ids
                            .into_iter()
                            .find(|id| !self.conflicts.contains(id))
                    });
                    if let Some(next) = waiting {
                        return self.offer_to(relay, next).await;
                    }
                }
                Ok(())
            }
        }
    }

    pub async fn handle_signal(
        &mut self,
        relay: &RelayChannel,
        from: PeerId,
        message: SignalingMessage,
    ) -> Result<(), BridgeError> {
        if self.conflicts.contains(&from) {
            debug!(%from, "Signal from conflicting peer dropped");
            return Ok(());
        }
        if let Some(engaged) = self.remote_peer
            && engaged != from
        {
            debug!(%from, %engaged, "Signal from non-engaged peer dropped");
            return Ok(());
        }

        let state = self.link.state();
        match (self.role, message) {
            (Role::Controller, SignalingMessage::Offer { sdp }) if state == LinkState::Idle => {
                let answer = self.link.create_answer(sdp).await?;
                self.remote_peer = Some(from);
                relay.broadcast(&SignalingMessage::Answer { sdp: answer });
                info!(%from, link = self.link.id(), "Answer sent");
            }

            (Role::Receiver, SignalingMessage::Answer { sdp })
                if state == LinkState::OfferCreated =>
            {
                self.link.accept_answer(sdp).await?;
                info!(%from, link = self.link.id(), "Answer accepted");
            }

            (_, SignalingMessage::IceCandidate { candidate }) => {
                self.link.add_remote_ice_candidate(&candidate).await?;
            }

            (role, message) => {
                warn!(
                    %from,
                    %role,
                    %state,
                    "Unexpected {} dropped",
                    message.kind()
                );
            }
        }

        Ok(())
    }

    /// Forwards a locally generated candidate over the relay until the link
    /// is connected. Returns whether it was sent.
    pub fn forward_candidate(&self, relay: &RelayChannel, candidate: String) -> bool {
        if self.link.state() == LinkState::Connected {
            debug!(link = self.link.id(), "Link connected, local candidate not forwarded");
            return false;
        }
        relay.broadcast(&SignalingMessage::IceCandidate { candidate })
    }

    pub async fn close(&mut self) -> Result<(), BridgeError> {
        self.link.close().await?;
        Ok(())
    }

    async fn offer_to(&mut self, relay: &RelayChannel, peer_id: PeerId) -> Result<(), BridgeError> {
        if self.remote_peer.is_some() || self.link.state() != LinkState::Idle {
            debug!(%peer_id, "Already negotiating, no new offer");
            return Ok(());
        }

        let offer = self.link.create_offer().await?;
        self.remote_peer = Some(peer_id);
        relay.broadcast(&SignalingMessage::Offer { sdp: offer });
        info!(%peer_id, link = self.link.id(), "Offer sent");
        Ok(())
    }

    async fn reset_link(&mut self) -> Result<(), BridgeError> {
        self.remote_peer = None;
        if let Err(e) = self.link.close().await {
            warn!(link = self.link.id(), "Closing replaced link failed: {}", e);
        }

        let id = self.next_link_id;
        self.next_link_id += 1;
        self.link = PeerLink::new(id, &self.transport, self.link_tx.clone()).await?;
        Ok(())
    }
}
