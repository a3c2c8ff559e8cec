use crate::room::{Room, RoomCommand};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tether_core::RoomId;
use tokio::sync::mpsc;
use tracing::info;

struct RoomEntry {
    sender: mpsc::Sender<RoomCommand>,
    members: usize,
}

/// Lazily spawns one [`Room`] actor per room id and hands out its command
/// sender.
///
/// Every [`acquire_room`](Self::acquire_room) must be paired with a
/// [`release_room`](Self::release_room). When the last member releases, the
/// entry is dropped; the room actor ends once the remaining senders held by
/// detaching members are gone.
#[derive(Clone)]
pub struct RoomManager {
    rooms: Arc<DashMap<RoomId, RoomEntry>>,
    capacity: usize,
}

impl RoomManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Registers one more member of `room_id` and returns the room's sender,
    /// creating the room if it does not exist.
    pub fn acquire_room(&self, room_id: &RoomId) -> mpsc::Sender<RoomCommand> {
        let mut entry = self.rooms.entry(room_id.clone()).or_insert_with(|| {
            info!("Creating new room: {}", room_id);
            let (tx, rx) = mpsc::channel(self.capacity);
            tokio::spawn(Room::new(room_id.clone(), rx).run());
            RoomEntry {
                sender: tx,
                members: 0,
            }
        });
        entry.members += 1;
        entry.sender.clone()
    }

    /// Unregisters one member of `room_id`; the room is forgotten when none
    /// remain.
    pub fn release_room(&self, room_id: &RoomId) {
        if let Entry::Occupied(mut entry) = self.rooms.entry(room_id.clone()) {
            let slot = entry.get_mut();
            slot.members = slot.members.saturating_sub(1);
            if slot.members == 0 {
                entry.remove();
                info!("Room {} is empty, removed", room_id);
            }
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(100)
    }
}
