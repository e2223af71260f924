//! Read-only state for the presentation layer
//!
//! Rendering, camera, HUD and audio read these structs; nothing in them feeds back
//! into the simulation.

use serde::{Deserialize, Serialize};

use crate::engine::match_state::{MatchPhase, Score};
use crate::engine::math::{Rot, Vec3};
use crate::engine::team::Team;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub team: Team,
    pub position: Vec3,
    pub rotation: Rot,
    pub linear_velocity: Vec3,
    /// Signed speed along the yaw-only forward axis
    pub speed: f32,
    pub boost_amount: f32,
    pub is_boosting: bool,
    pub is_grounded: bool,
    pub is_drifting: bool,
    pub jump_ready: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub position: Vec3,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub phase: MatchPhase,
    pub score: Score,
    pub time_remaining: f32,
    pub countdown_remaining: f32,
    pub vehicles: Vec<VehicleSnapshot>,
    pub ball: BallSnapshot,
}

impl FrameSnapshot {
    pub fn vehicle(&self, team: Team) -> Option<&VehicleSnapshot> {
        self.vehicles.iter().find(|v| v.team == team)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
