use crate::relay::RelayError;
use async_trait::async_trait;
use tether_core::{RelayFrame, RelayRequest};
use tokio::sync::mpsc;

/// One open connection to a relay, reduced to a pair of queues.
pub struct RelaySocket {
    pub outbound: mpsc::UnboundedSender<RelayRequest>,
    pub inbound: mpsc::UnboundedReceiver<RelayFrame>,
}

/// Opens relay connections. The relay service behind it is hosted; this is
/// the seam tests replace with an in-process relay.
#[async_trait]
pub trait RelayConnector: Send + Sync {
    async fn open(&self) -> Result<RelaySocket, RelayError>;
}
