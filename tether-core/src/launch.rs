//! Start-up decisions derived from the page URL: which role this endpoint
//! plays and which relay room it joins.

use crate::model::{Role, RoomId};
use crate::utils::{CONTROL_PARAM, ROOM_PARAM};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("invalid page url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("'{CONTROL_PARAM}' flag is present but carries no room id")]
    MissingRoom,
}

/// Presence of the `control` flag makes this endpoint the controller, its
/// absence the receiver. The flag's value is not inspected.
pub fn resolve_role(url: &Url) -> Role {
    if url.query_pairs().any(|(key, _)| key == CONTROL_PARAM) {
        Role::Controller
    } else {
        Role::Receiver
    }
}

/// The link a receiver hands out so a controller joins the same room.
pub fn controller_join_url(page: &Url, room_id: &RoomId) -> Url {
    let mut url = page.clone();
    url.set_fragment(None);
    url.query_pairs_mut()
        .clear()
        .append_pair(CONTROL_PARAM, room_id.as_str());
    url
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaunchParams {
    pub role: Role,
    pub room_id: RoomId,
}

impl LaunchParams {
    pub fn parse(page: &str) -> Result<Self, LaunchError> {
        Self::from_url(&Url::parse(page)?)
    }

    /// Controllers take the room from the `control` flag. Receivers use the
    /// `room` parameter when given and otherwise open a fresh room.
    pub fn from_url(page: &Url) -> Result<Self, LaunchError> {
        let role = resolve_role(page);
        let room_id = match role {
            Role::Controller => {
                let room = query_value(page, CONTROL_PARAM).ok_or(LaunchError::MissingRoom)?;
                RoomId::new(room)
            }
            Role::Receiver => query_value(page, ROOM_PARAM)
                .map(RoomId::new)
                .unwrap_or_else(RoomId::generate),
        };

        Ok(Self { role, room_id })
    }
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
