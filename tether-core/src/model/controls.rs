use serde::{Deserialize, Serialize};

/// The replicated input snapshot. Always transmitted whole.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlState {
    pub a: bool,
    pub b: bool,
    pub trackpad: [f64; 2],
}

/// A partial local mutation. `None` fields keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trackpad: Option<[f64; 2]>,
}

impl ControlPatch {
    pub fn a(pressed: bool) -> Self {
        Self {
            a: Some(pressed),
            ..Self::default()
        }
    }

    pub fn b(pressed: bool) -> Self {
        Self {
            b: Some(pressed),
            ..Self::default()
        }
    }

    pub fn trackpad(x: f64, y: f64) -> Self {
        Self {
            trackpad: Some([x, y]),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_none() && self.b.is_none() && self.trackpad.is_none()
    }
}

impl ControlState {
    pub fn merge(&mut self, patch: ControlPatch) {
        if let Some(a) = patch.a {
            self.a = a;
        }
        if let Some(b) = patch.b {
            self.b = b;
        }
        if let Some(trackpad) = patch.trackpad {
            self.trackpad = trackpad;
        }
    }
}
