use bytes::Bytes;

/// Monotonic id of a connection attempt.
pub type LinkId = u64;

/// Events a [`PeerLink`](crate::transport::PeerLink) pushes to its owner.
/// Each carries the id of the link that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    /// Local ICE candidate, JSON-encoded, to be forwarded to the peer.
    CandidateGenerated(LinkId, String),

    /// The data channel opened.
    ChannelOpen(LinkId),

    /// The data channel or the underlying connection went away.
    ChannelClosed(LinkId),

    /// Payload received on the data channel.
    Message(LinkId, Bytes),
}

impl LinkEvent {
    pub fn link_id(&self) -> LinkId {
        match self {
            LinkEvent::CandidateGenerated(id, _)
            | LinkEvent::ChannelOpen(id)
            | LinkEvent::ChannelClosed(id)
            | LinkEvent::Message(id, _) => *id,
        }
    }
}
