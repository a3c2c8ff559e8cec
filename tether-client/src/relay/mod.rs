mod relay_channel;
mod relay_connector;
mod relay_error;
mod ws_connector;

pub use relay_channel::*;
pub use relay_connector::*;
pub use relay_error::*;
pub use ws_connector::*;
