use crate::relay::{RelayConnector, RelayError, RelaySocket};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tether_core::{RelayFrame, RelayRequest};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};
use url::Url;

/// Connects to a `tether-server` relay endpoint (`ws://host:port/relay`).
#[derive(Debug, Clone)]
pub struct WsConnector {
    url: Url,
}

impl WsConnector {
    pub fn new(url: Url) -> Self {
        Self { url }
    }
}

#[async_trait]
impl RelayConnector for WsConnector {
    async fn open(&self) -> Result<RelaySocket, RelayError> {
        info!("Connecting to relay {}", self.url);
        let (ws_stream, _) = connect_async(self.url.as_str()).await?;
        let (mut ws_write, mut ws_read) = ws_stream.split();

        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<RelayRequest>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<RelayFrame>();

        tokio::spawn(async move {
            while let Some(request) = outbound_rx.recv().await {
                let text = match serde_json::to_string(&request) {
                    Ok(text) => text,
                    Err(e) => {
                        error!("Failed to serialize relay request: {}", e);
                        continue;
                    }
                };
                if let Err(e) = ws_write.send(Message::Text(text.into())).await {
                    warn!("Relay write failed: {}", e);
                    break;
                }
            }
            let _ = ws_write.close().await;
            debug!("Relay writer finished");
        });

        tokio::spawn(async move {
            while let Some(msg) = ws_read.next().await {
                let msg = match msg {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!("Relay read failed: {}", e);
                        break;
                    }
                };
                match msg {
                    Message::Text(text) => match serde_json::from_str::<RelayFrame>(&text) {
                        Ok(frame) => {
                            if inbound_tx.send(frame).is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Malformed relay frame dropped: {}", e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            debug!("Relay reader finished");
        });

        Ok(RelaySocket {
            outbound: outbound_tx,
            inbound: inbound_rx,
        })
    }
}
