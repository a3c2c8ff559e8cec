use crate::transport::LinkError;
use tether_core::{PeerId, Role};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("peer {peer} joined with the same role ({role})")]
    RoleConflict { peer: PeerId, role: Role },

    #[error(transparent)]
    Link(#[from] LinkError),
}
