pub use tether_core::model::{ControlPatch, ControlState, PeerId, Role, RoomId};
pub use tether_core::{LaunchParams, controller_join_url, resolve_role};

pub mod model {
    pub use tether_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use tether_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use tether_client::*;
}
