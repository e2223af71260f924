//! AI Driver Configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// How far behind the ball (on the goal line) the approach point sits (default: 4.0)
    pub approach_offset: f32,
    /// Heading error ignored when steering (rad) (default: 0.15)
    pub steer_dead_zone: f32,
    /// Heading error beyond which the car drifts through the turn (rad) (default: 1.2)
    pub drift_angle: f32,
    /// Minimum speed for drifting (default: 10.0)
    pub drift_min_speed: f32,
    /// Reverse when the target is behind by more than this (rad) (default: 2.2)
    pub reverse_angle: f32,
    /// ... and closer than this (default: 10.0)
    pub reverse_distance: f32,
    /// Boost only beyond this distance (default: 25.0)
    pub boost_distance: f32,
    /// Boost only when heading error is below this (rad) (default: 0.3)
    pub boost_alignment: f32,
    /// Jump when the ball is this close horizontally (default: 6.0)
    pub jump_distance: f32,
    /// ... and at least this much higher than the car centre (default: 1.5)
    pub jump_height: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            approach_offset: 4.0,
            steer_dead_zone: 0.15,
            drift_angle: 1.2,
            drift_min_speed: 10.0,
            reverse_angle: 2.2,
            reverse_distance: 10.0,
            boost_distance: 25.0,
            boost_alignment: 0.3,
            jump_distance: 6.0,
            jump_height: 1.5,
        }
    }
}

impl AiConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.approach_offset < 0.0 || self.steer_dead_zone < 0.0 {
            return Err("ai.approach_offset and ai.steer_dead_zone must be non-negative".into());
        }
        if !(self.reverse_angle > 0.0 && self.reverse_angle <= std::f32::consts::PI) {
            return Err("ai.reverse_angle must be within (0, π]".into());
        }
        Ok(())
    }
}
