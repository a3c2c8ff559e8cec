use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tether_client::{RelayConnector, RelayError, RelaySocket};
use tether_core::{RelayRequest, SignalingMessage};
use tether_server::RelayService;
use tokio::sync::mpsc;

/// In-process relay: connections attach straight to a [`RelayService`].
///
/// Every broadcast passing through is recorded by kind. With
/// `without_handshake` the offer/answer/candidate broadcasts are swallowed,
/// so the data channel can never open.
#[derive(Clone)]
pub struct LocalConnector {
    service: RelayService,
    drop_handshake: bool,
    sent: Arc<Mutex<Vec<&'static str>>>,
}

impl LocalConnector {
    pub fn new(service: RelayService) -> Self {
        Self {
            service,
            drop_handshake: false,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn without_handshake(service: RelayService) -> Self {
        Self {
            drop_handshake: true,
            ..Self::new(service)
        }
    }

    /// How many broadcasts of the given kind (`"offer"`, `"answer"`, ...)
    /// went through this connector.
    pub fn count(&self, kind: &str) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|sent| **sent == kind)
            .count()
    }
}

#[async_trait]
impl RelayConnector for LocalConnector {
    async fn open(&self) -> Result<RelaySocket, RelayError> {
        let (client_tx, mut client_rx) = mpsc::unbounded_channel::<RelayRequest>();
        let (server_tx, server_rx) = mpsc::unbounded_channel::<RelayRequest>();
        let (frame_tx, frame_rx) = mpsc::unbounded_channel();

        self.service.attach(server_rx, frame_tx);

        let sent = self.sent.clone();
        let drop_handshake = self.drop_handshake;
        tokio::spawn(async move {
            while let Some(request) = client_rx.recv().await {
                if let RelayRequest::Broadcast { event } = &request
                    && let Ok(message) = serde_json::from_value::<SignalingMessage>(event.clone())
                {
                    sent.lock().unwrap().push(message.kind());
                    if drop_handshake && message.is_handshake() {
                        continue;
                    }
                }
                if server_tx.send(request).is_err() {
                    break;
                }
            }
        });

        Ok(RelaySocket {
            outbound: client_tx,
            inbound: frame_rx,
        })
    }
}

/// A relay that cannot be reached.
pub struct UnreachableConnector;

#[async_trait]
impl RelayConnector for UnreachableConnector {
    async fn open(&self) -> Result<RelaySocket, RelayError> {
        Err(RelayError::Closed)
    }
}
