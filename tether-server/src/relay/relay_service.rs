use crate::config::RelayServerConfig;
use crate::relay::run_member;
use crate::room::RoomManager;
use tether_core::{PeerId, RelayFrame, RelayRequest};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Shared state of the relay endpoint.
#[derive(Clone, Default)]
pub struct RelayService {
    rooms: RoomManager,
}

impl RelayService {
    pub fn new(config: &RelayServerConfig) -> Self {
        Self {
            rooms: RoomManager::new(config.room_capacity),
        }
    }

    pub fn rooms(&self) -> &RoomManager {
        &self.rooms
    }

    /// Spawns a member task for a connection whose requests and frames travel
    /// over the given channels.
    pub fn attach(
        &self,
        requests: mpsc::UnboundedReceiver<RelayRequest>,
        frames: mpsc::UnboundedSender<RelayFrame>,
    ) -> JoinHandle<Option<PeerId>> {
        tokio::spawn(run_member(self.rooms.clone(), requests, frames))
    }
}
