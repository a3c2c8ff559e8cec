use crate::transport::candidate_queue::{Admission, CandidateQueue};
use crate::transport::{LinkError, LinkEvent, LinkId, LinkState, TransportConfig};
use bytes::Bytes;
use std::sync::Arc;
use tether_core::utils::DATA_CHANNEL_LABEL;
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_init::RTCDataChannelInit;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::data_channel::data_channel_state::RTCDataChannelState;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

type ChannelSlot = Arc<Mutex<Option<Arc<RTCDataChannel>>>>;

/// One direct peer connection carrying a single ordered data channel.
///
/// Created per connection attempt. Everything the connection reports
/// asynchronously (local candidates, channel lifecycle, messages) is pushed
/// into the event queue handed to [`PeerLink::new`], tagged with the link id.
pub struct PeerLink {
    id: LinkId,
    peer_connection: Arc<RTCPeerConnection>,
    data_channel: ChannelSlot,
    candidates: Mutex<CandidateQueue>,
    state: Arc<watch::Sender<LinkState>>,
    event_tx: mpsc::Sender<LinkEvent>,
}

impl PeerLink {
    pub async fn new(
        id: LinkId,
        config: &TransportConfig,
        event_tx: mpsc::Sender<LinkEvent>,
    ) -> Result<Self, LinkError> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config.rtc_ice_servers(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);
        let data_channel: ChannelSlot = Arc::new(Mutex::new(None));
        let (state, _) = watch::channel(LinkState::Idle);
        let state = Arc::new(state);

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(json_candidate) = candidate.to_json() else {
                    return;
                };
                let Ok(str_candidate) = serde_json::to_string(&json_candidate) else {
                    return;
                };
                let _ = tx
                    .send(LinkEvent::CandidateGenerated(id, str_candidate))
                    .await;
            })
        }));

        let pc_tx = event_tx.clone();
        let pc_slot = data_channel.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = pc_tx.clone();
                let slot = pc_slot.clone();

                Box::pin(async move {
                    info!(link = id, "Peer connection state changed: {:?}", s);
                    if matches!(
                        s,
                        RTCPeerConnectionState::Failed | RTCPeerConnectionState::Closed
                    ) && slot.lock().await.take().is_some()
                    {
                        let _ = tx.send(LinkEvent::ChannelClosed(id)).await;
                    }
                })
            },
        ));

        // The answering side receives the channel instead of creating it.
        let dc_tx = event_tx.clone();
        let dc_slot = data_channel.clone();
        let dc_state = state.clone();
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let tx = dc_tx.clone();
            let slot = dc_slot.clone();
            let state = dc_state.clone();

            Box::pin(async move {
                debug!(link = id, "Remote data channel '{}' announced", dc.label());
                wire_channel(id, dc, slot, state, tx);
            })
        }));

        Ok(Self {
            id,
            peer_connection,
            data_channel,
            candidates: Mutex::new(CandidateQueue::default()),
            state,
            event_tx,
        })
    }

    pub fn id(&self) -> LinkId {
        self.id
    }

    pub fn state(&self) -> LinkState {
        *self.state.borrow()
    }

    /// Creates the data channel and a local offer. Only valid from `Idle`.
    pub async fn create_offer(&self) -> Result<String, LinkError> {
        self.expect_state("create an offer", LinkState::Idle)?;

        let init = RTCDataChannelInit {
            ordered: Some(true),
            ..Default::default()
        };
        let dc = self
            .peer_connection
            .create_data_channel(DATA_CHANNEL_LABEL, Some(init))
            .await?;
        wire_channel(
            self.id,
            dc,
            self.data_channel.clone(),
            self.state.clone(),
            self.event_tx.clone(),
        );

        let offer = self.peer_connection.create_offer(None).await?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await?;

        self.advance(LinkState::Idle, LinkState::OfferCreated);
        Ok(offer.sdp)
    }

    /// Applies the remote offer, releases buffered candidates and creates the
    /// local answer. Only valid from `Idle`.
    pub async fn create_answer(&self, remote_offer: String) -> Result<String, LinkError> {
        self.expect_state("create an answer", LinkState::Idle)?;

        let desc = RTCSessionDescription::offer(remote_offer)?;
        self.peer_connection.set_remote_description(desc).await?;
        self.flush_candidates().await;

        let answer = self.peer_connection.create_answer(None).await?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await?;

        self.advance(LinkState::Idle, LinkState::AnswerCreated);
        Ok(answer.sdp)
    }

    /// Applies the remote answer to our offer. Only valid from `OfferCreated`;
    /// `Connected` follows once the data channel opens.
    pub async fn accept_answer(&self, remote_answer: String) -> Result<(), LinkError> {
        self.expect_state("accept an answer", LinkState::OfferCreated)?;

        let desc = RTCSessionDescription::answer(remote_answer)?;
        self.peer_connection.set_remote_description(desc).await?;
        self.advance(LinkState::OfferCreated, LinkState::AnswerPending);
        self.flush_candidates().await;

        Ok(())
    }

    /// Accepts a JSON-encoded remote candidate. Candidates that arrive before
    /// the remote description are buffered; repeats are ignored.
    pub async fn add_remote_ice_candidate(&self, candidate: &str) -> Result<(), LinkError> {
        if self.state() == LinkState::Closed {
            return Err(LinkError::Closed);
        }

        let init: RTCIceCandidateInit = serde_json::from_str(candidate)?;
        if init.candidate.is_empty() {
            debug!(link = self.id, "End-of-candidates marker ignored");
            return Ok(());
        }

        let (admission, pending) = {
            let mut queue = self.candidates.lock().await;
            let admission = queue.admit(init);
            (admission, queue.pending_len())
        };
        match admission {
            Admission::ApplyNow(init) => {
                self.peer_connection.add_ice_candidate(init).await?;
            }
            Admission::Buffered => {
                debug!(link = self.id, pending, "Remote candidate buffered until remote description");
            }
            Admission::Duplicate => {
                debug!(link = self.id, "Duplicate remote candidate ignored");
            }
        }

        Ok(())
    }

    /// Sends a text payload on the data channel. Returns `false` without
    /// error when the channel is not open.
    pub async fn send(&self, payload: &str) -> bool {
        let Some(dc) = self.open_channel().await else {
            debug!(link = self.id, "Send skipped: data channel not open");
            return false;
        };

        match dc.send_text(payload.to_owned()).await {
            Ok(_) => true,
            Err(e) => {
                warn!(link = self.id, "Data channel send failed: {}", e);
                false
            }
        }
    }

    pub async fn is_open(&self) -> bool {
        self.open_channel().await.is_some()
    }

    /// Closes the connection. Later calls do nothing.
    pub async fn close(&self) -> Result<(), LinkError> {
        let was_open = self.state.send_if_modified(|state| {
            if *state == LinkState::Closed {
                false
            } else {
                *state = LinkState::Closed;
                true
            }
        });
        if !was_open {
            return Ok(());
        }

        self.data_channel.lock().await.take();
        self.peer_connection.close().await?;
        info!(link = self.id, "Peer link closed");
        Ok(())
    }

    async fn open_channel(&self) -> Option<Arc<RTCDataChannel>> {
        let slot = self.data_channel.lock().await;
        slot.as_ref()
            .filter(|dc| dc.ready_state() == RTCDataChannelState::Open)
            .cloned()
    }

    async fn flush_candidates(&self) {
        let ready = self.candidates.lock().await.release();
        if !ready.is_empty() {
            debug!(link = self.id, count = ready.len(), "Applying buffered remote candidates");
        }
        for init in ready {
            if let Err(e) = self.peer_connection.add_ice_candidate(init).await {
                warn!(link = self.id, "Failed to apply buffered candidate: {}", e);
            }
        }
    }

    fn expect_state(&self, op: &'static str, expected: LinkState) -> Result<(), LinkError> {
        match self.state() {
            state if state == expected => Ok(()),
            LinkState::Closed => Err(LinkError::Closed),
            state => Err(LinkError::InvalidState { op, state }),
        }
    }

    /// Moves `from -> to` unless something else (channel open, close) already
    /// moved the link on.
    fn advance(&self, from: LinkState, to: LinkState) {
        self.state.send_if_modified(|state| {
            if *state == from {
                *state = to;
                true
            } else {
                false
            }
        });
    }
}

fn wire_channel(
    id: LinkId,
    dc: Arc<RTCDataChannel>,
    slot: ChannelSlot,
    state: Arc<watch::Sender<LinkState>>,
    event_tx: mpsc::Sender<LinkEvent>,
) {
    let open_tx = event_tx.clone();
    let open_dc = dc.clone();
    dc.on_open(Box::new(move || {
        let tx = open_tx.clone();
        let dc = open_dc.clone();
        let slot = slot.clone();
        let state = state.clone();

        Box::pin(async move {
            let connected = state.send_if_modified(|s| {
                if *s == LinkState::Closed {
                    false
                } else {
                    *s = LinkState::Connected;
                    true
                }
            });
            if !connected {
                return;
            }
            *slot.lock().await = Some(dc);
            info!(link = id, "Data channel open");
            let _ = tx.send(LinkEvent::ChannelOpen(id)).await;
        })
    }));

    let close_tx = event_tx.clone();
    dc.on_close(Box::new(move || {
        let tx = close_tx.clone();
        Box::pin(async move {
            info!(link = id, "Data channel closed");
            let _ = tx.send(LinkEvent::ChannelClosed(id)).await;
        })
    }));

    let msg_tx = event_tx;
    dc.on_message(Box::new(move |msg: DataChannelMessage| {
        let tx = msg_tx.clone();
        Box::pin(async move {
            let bytes = Bytes::from(msg.data.to_vec());
            let _ = tx.send(LinkEvent::Message(id, bytes)).await;
        })
    }));
}
