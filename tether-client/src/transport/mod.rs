mod candidate_queue;
mod link_error;
mod link_event;
mod link_state;
mod peer_link;
mod transport_config;

pub use link_error::*;
pub use link_event::*;
pub use link_state::*;
pub use peer_link::*;
pub use transport_config::*;
