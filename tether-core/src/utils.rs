pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun1.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_3: &str = "stun:stun2.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_4: &str = "stun:stun3.l.google.com:19302";

/// Query flag whose presence makes an endpoint the controller. Its value is
/// the room id.
pub const CONTROL_PARAM: &str = "control";

/// Optional query parameter carrying the room id on the receiver side.
pub const ROOM_PARAM: &str = "room";

/// Label of the single ordered data channel.
pub const DATA_CHANNEL_LABEL: &str = "controls";
