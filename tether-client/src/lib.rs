pub mod bridge;
pub mod relay;
pub mod session;
pub mod sync;
pub mod transport;

pub use bridge::*;
pub use relay::*;
pub use session::*;
pub use sync::*;
pub use transport::*;
