use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the remote control this endpoint plays. Fixed for the
/// lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Hand-held side: produces input, answers the offer.
    Controller,
    /// Display side: consumes input, issues the offer.
    Receiver,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Controller => f.write_str("controller"),
            Role::Receiver => f.write_str("receiver"),
        }
    }
}
