use crate::relay::RelayChannel;
use crate::transport::PeerLink;
use tether_core::{ControlPatch, ControlState, SignalingMessage};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Which transport carried a local update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncRoute {
    DataChannel,
    Relay,
    /// Neither transport was usable; the update only changed local state.
    Dropped,
}

/// Owner of the replicated [`ControlState`].
///
/// Local patches are merged and the whole state is transmitted; remote
/// updates replace the state wholesale. There are no sequence numbers, so
/// concurrent writers resolve to whichever update arrives last.
pub struct SyncManager {
    controls: ControlState,
    controls_tx: watch::Sender<ControlState>,
}

impl SyncManager {
    pub fn new(initial: ControlState) -> Self {
        let (controls_tx, _) = watch::channel(initial);
        Self {
            controls: initial,
            controls_tx,
        }
    }

    pub fn controls(&self) -> ControlState {
        self.controls
    }

    pub fn subscribe(&self) -> watch::Receiver<ControlState> {
        self.controls_tx.subscribe()
    }

    /// Merges `patch` and sends the full state: data channel when open,
    /// relay broadcast otherwise.
    pub async fn set_local(
        &mut self,
        patch: ControlPatch,
        link: &PeerLink,
        relay: &RelayChannel,
    ) -> SyncRoute {
        self.controls.merge(patch);
        self.publish();

        let message = SignalingMessage::ControlsUpdate {
            controls: self.controls,
        };
        let payload = match serde_json::to_string(&message) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize controls: {}", e);
                return SyncRoute::Dropped;
            }
        };

        if link.send(&payload).await {
            SyncRoute::DataChannel
        } else if relay.broadcast(&message) {
            SyncRoute::Relay
        } else {
            debug!("No transport available, update kept locally");
            SyncRoute::Dropped
        }
    }

    /// Applies an inbound message. Returns `false` for anything that is not a
    /// controls update.
    pub fn on_remote_update(&mut self, message: &SignalingMessage) -> bool {
        let SignalingMessage::ControlsUpdate { controls } = message else {
            return false;
        };
        self.controls = *controls;
        self.publish();
        true
    }

    fn publish(&self) {
        self.controls_tx.send_replace(self.controls);
    }
}

/// Decodes a data channel payload.
pub fn decode_message(payload: &[u8]) -> Result<SignalingMessage, serde_json::Error> {
    serde_json::from_slice(payload)
}
