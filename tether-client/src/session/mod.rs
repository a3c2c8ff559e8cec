mod session;
mod session_command;
mod session_config;
mod session_error;
mod session_handle;
mod session_status;

pub use session::*;
pub(crate) use session_command::*;
pub use session_config::*;
pub use session_error::*;
pub use session_handle::*;
pub use session_status::*;
