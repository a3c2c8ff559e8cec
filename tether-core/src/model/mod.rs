mod controls;
mod peer;
mod relay;
mod role;
mod room;
mod signaling;

pub use controls::{ControlPatch, ControlState};
pub use peer::PeerId;
pub use relay::{Member, Presence, RelayFrame, RelayRequest};
pub use role::Role;
pub use room::RoomId;
pub use signaling::{IceServerConfig, SignalingMessage};
