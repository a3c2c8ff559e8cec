use std::fmt;

/// Lifecycle of one connection attempt.
///
/// Offering side: `Idle -> OfferCreated -> AnswerPending -> Connected -> Closed`.
/// Answering side: `Idle -> AnswerCreated -> Connected -> Closed`.
/// There is no failed state; a link that never connects stays where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Idle,
    OfferCreated,
    AnswerPending,
    AnswerCreated,
    Connected,
    Closed,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkState::Idle => "idle",
            LinkState::OfferCreated => "offer-created",
            LinkState::AnswerPending => "answer-pending",
            LinkState::AnswerCreated => "answer-created",
            LinkState::Connected => "connected",
            LinkState::Closed => "closed",
        };
        f.write_str(name)
    }
}
