//! Control intents
//!
//! `ControlState` is the snapshot a vehicle reads each tick. Input sources (keyboard
//! bridge, AI) never poke fields directly: they send a `ControlPatch`, and only the
//! fields the patch names change.
//!
//! Conflicting pairs are resolved by cancellation:
//! - accelerate + reverse → no throttle
//! - steer_left + steer_right → no steering

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlState {
    pub accelerate: bool,
    pub reverse: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    pub boost: bool,
    pub jump: bool,
    pub drift: bool,
}

impl ControlState {
    /// Throttle axis in {-1, 0, +1}
    pub fn throttle(&self) -> f32 {
        match (self.accelerate, self.reverse) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    /// Steering axis in {-1, 0, +1}; +1 is left
    pub fn steer(&self) -> f32 {
        match (self.steer_left, self.steer_right) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == ControlState::default()
    }

    /// Merge the named intents of `patch`, leaving the rest untouched
    pub fn apply(&mut self, patch: &ControlPatch) {
        fn merge(field: &mut bool, value: Option<bool>) {
            if let Some(v) = value {
                *field = v;
            }
        }
        merge(&mut self.accelerate, patch.accelerate);
        merge(&mut self.reverse, patch.reverse);
        merge(&mut self.steer_left, patch.steer_left);
        merge(&mut self.steer_right, patch.steer_right);
        merge(&mut self.boost, patch.boost);
        merge(&mut self.jump, patch.jump);
        merge(&mut self.drift, patch.drift);
    }
}

/// Partial update of a `ControlState`. `None` means "leave as is".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlPatch {
    pub accelerate: Option<bool>,
    pub reverse: Option<bool>,
    pub steer_left: Option<bool>,
    pub steer_right: Option<bool>,
    pub boost: Option<bool>,
    pub jump: Option<bool>,
    pub drift: Option<bool>,
}

impl ControlPatch {
    /// Patch that sets every intent, i.e. a wholesale replacement
    pub fn full(state: ControlState) -> Self {
        Self {
            accelerate: Some(state.accelerate),
            reverse: Some(state.reverse),
            steer_left: Some(state.steer_left),
            steer_right: Some(state.steer_right),
            boost: Some(state.boost),
            jump: Some(state.jump),
            drift: Some(state.drift),
        }
    }

    pub fn accelerate(mut self, on: bool) -> Self {
        self.accelerate = Some(on);
        self
    }

    pub fn reverse(mut self, on: bool) -> Self {
        self.reverse = Some(on);
        self
    }

    pub fn steer_left(mut self, on: bool) -> Self {
        self.steer_left = Some(on);
        self
    }

    pub fn steer_right(mut self, on: bool) -> Self {
        self.steer_right = Some(on);
        self
    }

    pub fn boost(mut self, on: bool) -> Self {
        self.boost = Some(on);
        self
    }

    pub fn jump(mut self, on: bool) -> Self {
        self.jump = Some(on);
        self
    }

    pub fn drift(mut self, on: bool) -> Self {
        self.drift = Some(on);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == ControlPatch::default()
    }
}
