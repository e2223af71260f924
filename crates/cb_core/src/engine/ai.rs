//! AI Driver - ball-chasing intent source
//!
//! Produces a `ControlPatch` from the world state, exactly like a keyboard bridge would.
//! It never touches a rigid body.
//!
//! ## Behaviour
//! 1. Approach point = ball, pulled back along the goal→ball line by `approach_offset`
//!    (so contact pushes the ball goal-ward). Close to the ball, aim at the ball itself.
//! 2. Target behind and close → reverse; otherwise accelerate.
//! 3. Steer toward the target outside the dead zone; drift through sharp turns.
//! 4. Boost when aligned and far, jump when the ball is close and above the roof.

use crate::engine::arena::Arena;
use crate::engine::config::AiConfig;
use crate::engine::controls::{ControlPatch, ControlState};
use crate::engine::math::{horizontal, normalize_or, wrap_angle, yaw_of, Vec3};
use crate::engine::physics::BodyState;
use crate::engine::team::Team;

/// Horizontal seek direction, zero when already on target
#[inline]
pub fn seek(current: Vec3, target: Vec3) -> Vec3 {
    normalize_or(horizontal(target - current), Vec3::zeros())
}

/// Signed heading error (rad) from `yaw` to the direction of `to_target`; positive = target on the left
#[inline]
pub fn heading_error(yaw: f32, to_target: Vec3) -> f32 {
    wrap_angle(to_target.x.atan2(to_target.z) - yaw)
}

#[derive(Debug, Clone, Default)]
pub struct AiDriver {
    cfg: AiConfig,
}

impl AiDriver {
    pub fn new(cfg: AiConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &AiConfig {
        &self.cfg
    }

    /// Point the car drives toward this tick
    pub fn target(&self, team: Team, vehicle_position: Vec3, ball_position: Vec3, arena: &Arena) -> Vec3 {
        let goal = arena.attacking_goal(team).mouth_center();
        let attack_dir = normalize_or(horizontal(goal - ball_position), Vec3::z() * team.attack_sign());

        let to_ball = horizontal(ball_position - vehicle_position).norm();
        if to_ball < self.cfg.approach_offset * 1.5 {
            return ball_position;
        }
        ball_position - attack_dir * self.cfg.approach_offset
    }

    pub fn decide(&self, team: Team, vehicle: &BodyState, ball: &BodyState, arena: &Arena) -> ControlPatch {
        let cfg = &self.cfg;
        let position = vehicle.position;
        let target = self.target(team, position, ball.position, arena);

        let to_target = horizontal(target - position);
        let distance = to_target.norm();
        let error = if distance > 1.0e-3 { heading_error(yaw_of(&vehicle.rotation), to_target) } else { 0.0 };
        let speed = horizontal(vehicle.linear_velocity).norm();

        let mut intent = ControlState::default();

        let reversing = error.abs() > cfg.reverse_angle && distance < cfg.reverse_distance;
        intent.reverse = reversing;
        intent.accelerate = !reversing;

        // Steering inverts in reverse inside the controller, so the sign is the same either way
        if error > cfg.steer_dead_zone {
            intent.steer_left = true;
        } else if error < -cfg.steer_dead_zone {
            intent.steer_right = true;
        }

        intent.drift = !reversing && error.abs() > cfg.drift_angle && speed > cfg.drift_min_speed;
        intent.boost = !reversing && error.abs() < cfg.boost_alignment && distance > cfg.boost_distance;

        let ball_distance = horizontal(ball.position - position).norm();
        intent.jump = ball_distance < cfg.jump_distance && ball.position.y > position.y + cfg.jump_height;

        ControlPatch::full(intent)
    }
}
