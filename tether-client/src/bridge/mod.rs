mod bridge_error;
mod signaling_bridge;

pub use bridge_error::*;
pub use signaling_bridge::*;
