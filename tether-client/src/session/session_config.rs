use crate::transport::TransportConfig;
use tether_core::{LaunchParams, Role, RoomId};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub role: Role,
    pub room_id: RoomId,
    pub transport: TransportConfig,
}

impl SessionConfig {
    pub fn from_launch(params: LaunchParams, transport: TransportConfig) -> Self {
        Self {
            role: params.role,
            room_id: params.room_id,
            transport,
        }
    }
}
