use std::collections::HashSet;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;

pub(crate) enum Admission {
    ApplyNow(RTCIceCandidateInit),
    Buffered,
    Duplicate,
}

/// Holds remote candidates until the remote description is set, then lets
/// each distinct candidate through exactly once, in arrival order.
#[derive(Default)]
pub(crate) struct CandidateQueue {
    remote_set: bool,
    pending: Vec<RTCIceCandidateInit>,
    seen: HashSet<String>,
}

impl CandidateQueue {
    pub(crate) fn admit(&mut self, candidate: RTCIceCandidateInit) -> Admission {
        if !self.seen.insert(candidate.candidate.clone()) {
            return Admission::Duplicate;
        }
        if self.remote_set {
            Admission::ApplyNow(candidate)
        } else {
            self.pending.push(candidate);
            Admission::Buffered
        }
    }

    /// Marks the remote description as set and drains the buffer.
    pub(crate) fn release(&mut self) -> Vec<RTCIceCandidateInit> {
        self.remote_set = true;
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
