//! Vehicle Controller (차량 컨트롤러)
//!
//! Per-tick mapping from (control snapshot, rigid-body state, dt) to a new rigid-body
//! state plus boost / jump bookkeeping.
//!
//! ## Model
//! - Scalar speed along the yaw-only forward axis. While grounded the body's horizontal
//!   velocity is rewritten as `forward * speed + retained lateral velocity`.
//! - `speed` never exceeds what the body actually moved with along `forward` during
//!   the last step, so a car pinned against a wall does not bank phantom speed.
//! - While airborne throttle has no traction; `speed` follows the body's velocity so
//!   landing is continuous.
//! - Vertical velocity is only touched by the jump.
//!
//! ## Tick order
//! 1. ground probe
//! 2. jump cooldown, boost bookkeeping
//! 3. longitudinal speed + lateral grip (grounded) / air boost force
//! 4. steering (yaw rate)
//! 5. orientation (force upright or damped stabilisation)
//! 6. jump
//! 7. horizontal speed clamp

use tracing::{debug, warn};

use crate::engine::config::{UprightPolicy, VehicleConfig};
use crate::engine::controls::{ControlPatch, ControlState};
use crate::engine::math::{
    horizontal, move_toward, normalize_or, tilt_angle, with_horizontal, world_up, yaw_forward,
    yaw_only, yaw_rotation, Rot, Vec3,
};
use crate::engine::physics::{require_state, BodyDesc, BodyHandle, BodyState, Ray, RigidBodyProvider};
use crate::engine::physics_constants::vehicle as body;
use crate::engine::snapshot::VehicleSnapshot;
use crate::engine::team::Team;
use crate::error::{contract_violation, CoreError, Result};

/// Full boost tank
pub const MAX_BOOST: f32 = 100.0;

/// Spawn pose for a team: on its own half, facing the opponent's goal
pub fn spawn_pose(team: Team, cfg: &VehicleConfig) -> (Vec3, Rot) {
    let position = Vec3::new(0.0, cfg.height * 0.5, -team.attack_sign() * body::SPAWN_DISTANCE);
    (position, yaw_rotation(team.spawn_yaw()))
}

/// Yaw rate (rad/s) for a given speed.
///
/// Effectiveness falls linearly from 1 at standstill to `high_speed_turn_floor` at
/// `max_speed`, then drift multiplies it.
pub fn turn_rate_for(cfg: &VehicleConfig, speed: f32, drifting: bool) -> f32 {
    let ratio = (speed.abs() / cfg.max_speed).clamp(0.0, 1.0);
    let speed_factor = 1.0 - (1.0 - cfg.high_speed_turn_floor) * ratio;
    let drift = if drifting { cfg.drift_turn_multiplier } else { 1.0 };
    cfg.base_turn_rate * speed_factor * drift
}

/// Scalar speed limited to the forward velocity the body really had, keeping its sign
fn blocked_speed(speed: f32, moved: f32) -> f32 {
    if speed >= 0.0 {
        speed.min(moved.max(0.0))
    } else {
        speed.max(moved.min(0.0))
    }
}

#[derive(Debug, Clone)]
pub struct Vehicle {
    body: BodyHandle,
    team: Team,
    cfg: VehicleConfig,
    controls: ControlState,
    /// Signed speed along the yaw-only forward axis
    speed: f32,
    boost_amount: f32,
    is_boosting: bool,
    grounded: bool,
    /// Set by a jump, cleared once grounded again with the cooldown elapsed
    is_jumping: bool,
    jump_cooldown_remaining: f32,
}

impl Vehicle {
    /// Create the vehicle's rigid body at the team's spawn pose
    pub fn spawn<P: RigidBodyProvider + ?Sized>(provider: &mut P, team: Team, cfg: VehicleConfig) -> Self {
        let (position, rotation) = spawn_pose(team, &cfg);
        let desc = BodyDesc::cuboid(cfg.half_extents(), cfg.mass)
            .material(cfg.friction, cfg.restitution)
            .damping(cfg.linear_damping, cfg.angular_damping)
            .at(position, rotation);
        let body = provider.create_body(desc);
        debug!(%team, %body, "vehicle spawned");

        Self {
            body,
            team,
            cfg,
            controls: ControlState::default(),
            speed: 0.0,
            boost_amount: MAX_BOOST,
            is_boosting: false,
            grounded: false,
            is_jumping: false,
            jump_cooldown_remaining: 0.0,
        }
    }

    // ========== Accessors ==========

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.cfg
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn boost_amount(&self) -> f32 {
        self.boost_amount
    }

    pub fn is_boosting(&self) -> bool {
        self.is_boosting
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_drifting(&self) -> bool {
        self.controls.drift && self.grounded
    }

    pub fn jump_cooldown_remaining(&self) -> f32 {
        self.jump_cooldown_remaining
    }

    /// Jump is armed: cooldown elapsed and not mid-jump
    pub fn jump_ready(&self) -> bool {
        self.jump_cooldown_remaining <= 0.0 && !self.is_jumping
    }

    /// Armed and on the ground
    pub fn can_jump(&self) -> bool {
        self.grounded && self.jump_ready()
    }

    /// Current yaw rate for this vehicle's speed and drift state
    pub fn turn_rate(&self) -> f32 {
        turn_rate_for(&self.cfg, self.speed, self.is_drifting())
    }

    // ========== Input ==========

    /// Merge the named intents; the rest keep their value
    pub fn set_controls(&mut self, patch: &ControlPatch) {
        self.controls.apply(patch);
    }

    // ========== Lifecycle ==========

    /// Back to the spawn pose (or `position` with the spawn heading), at rest, full boost,
    /// no jump state, no intents.
    pub fn reset<P: RigidBodyProvider + ?Sized>(&mut self, provider: &mut P, position: Option<Vec3>) -> Result<()> {
        require_state(provider, self.body)?;
        let (spawn_position, rotation) = spawn_pose(self.team, &self.cfg);
        let position = position.unwrap_or(spawn_position);

        provider.set_pose(self.body, position, rotation);
        provider.halt(self.body);

        self.controls = ControlState::default();
        self.speed = 0.0;
        self.boost_amount = MAX_BOOST;
        self.is_boosting = false;
        self.is_jumping = false;
        self.jump_cooldown_remaining = 0.0;
        self.grounded = self.probe_ground(provider, position);

        debug!(team = %self.team, x = position.x, y = position.y, z = position.z, "vehicle reset");
        Ok(())
    }

    /// Reset when the body fell below `lower_bound_y` or its position went non-finite
    pub fn recover_if_out_of_bounds<P: RigidBodyProvider + ?Sized>(
        &mut self,
        provider: &mut P,
        lower_bound_y: f32,
    ) -> Result<bool> {
        let state = require_state(provider, self.body)?;
        let p = state.position;
        let lost = !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) || p.y < lower_bound_y;
        if !lost {
            return Ok(false);
        }
        warn!(team = %self.team, y = p.y, "vehicle out of bounds, resetting");
        self.reset(provider, None)?;
        Ok(true)
    }

    /// Recoil from a ball hit. The impulse goes through the provider and its forward
    /// part is folded into the scalar speed so the next tick does not overwrite it.
    pub fn apply_recoil<P: RigidBodyProvider + ?Sized>(&mut self, provider: &mut P, impulse: Vec3) -> Result<()> {
        let state = require_state(provider, self.body)?;
        provider.apply_impulse(self.body, impulse);
        let forward = yaw_forward(&state.rotation);
        self.speed += (impulse / self.cfg.mass).dot(&forward);
        self.speed = self.speed.clamp(-self.cfg.max_reverse_speed(), self.cfg.effective_max_speed(self.is_boosting));
        Ok(())
    }

    // ========== Tick ==========

    /// The single per-tick entry point. `dt` must already be clamped by the driver.
    pub fn apply_controls<P: RigidBodyProvider + ?Sized>(&mut self, provider: &mut P, dt: f32) -> Result<()> {
        if !(dt >= 0.0 && dt.is_finite()) {
            return contract_violation(CoreError::InvalidDelta(dt));
        }
        let state = require_state(provider, self.body)?;

        self.grounded = self.probe_ground(provider, state.position);

        self.jump_cooldown_remaining = (self.jump_cooldown_remaining - dt).max(0.0);
        if self.grounded && self.jump_cooldown_remaining <= 0.0 {
            self.is_jumping = false;
        }

        self.update_boost(dt);

        let forward = yaw_forward(&state.rotation);
        let mut linear = state.linear_velocity;
        let mut angular = state.angular_velocity;

        if self.grounded {
            self.speed = blocked_speed(self.speed, horizontal(linear).dot(&forward));
            self.speed = self.integrate_speed(dt);
            linear = with_horizontal(linear, self.grounded_horizontal(linear, forward, dt));
        } else {
            self.speed = horizontal(linear).dot(&forward);
            if self.is_boosting {
                provider.apply_force(self.body, state.rotation * Vec3::z() * self.cfg.boost_air_force);
            }
        }

        angular.y = self.steer(angular.y);

        if let Some(rotation) = self.orient(&state, &mut angular, dt) {
            provider.set_rotation(self.body, rotation);
        }

        if self.controls.jump && self.can_jump() {
            linear.y = self.cfg.jump_velocity;
            self.is_jumping = true;
            self.jump_cooldown_remaining = self.cfg.jump_cooldown;
            self.grounded = false;
            debug!(team = %self.team, "jump");
        }

        linear = self.clamp_horizontal(linear);

        provider.set_linear_velocity(self.body, linear);
        provider.set_angular_velocity(self.body, angular);
        Ok(())
    }

    fn probe_ground<P: RigidBodyProvider + ?Sized>(&self, provider: &P, position: Vec3) -> bool {
        let ray = Ray::new(position, -world_up());
        provider.cast_ray(&ray, self.cfg.ground_ray_length(), Some(self.body)).is_some()
    }

    fn update_boost(&mut self, dt: f32) {
        let unlimited = self.cfg.boost_consumption <= 0.0;
        self.is_boosting = self.controls.boost && (unlimited || self.boost_amount > 0.0);
        if self.is_boosting {
            self.boost_amount = (self.boost_amount - self.cfg.boost_consumption * dt).max(0.0);
        } else if !self.controls.boost {
            // Holding boost on an empty tank does not recharge
            self.boost_amount = (self.boost_amount + self.cfg.boost_recharge * dt).min(MAX_BOOST);
        }
    }

    /// Longitudinal speed for this tick (grounded only)
    fn integrate_speed(&self, dt: f32) -> f32 {
        let cfg = &self.cfg;
        let throttle = self.controls.throttle();
        let mut speed = self.speed;

        if throttle > 0.0 {
            speed = if speed < 0.0 { (speed + cfg.brake_decel * dt).min(0.0) } else { speed + cfg.accel * dt };
        } else if throttle < 0.0 {
            speed = if speed > 0.0 { (speed - cfg.brake_decel * dt).max(0.0) } else { speed - cfg.reverse_accel * dt };
        } else if !self.is_boosting {
            speed = move_toward(speed, 0.0, cfg.coast_decel * dt);
        }

        if self.is_boosting {
            speed += cfg.boost_accel * dt;
        }

        speed.clamp(-cfg.max_reverse_speed(), cfg.effective_max_speed(self.is_boosting))
    }

    /// Forward part from `speed`, lateral part decayed by grip
    fn grounded_horizontal(&self, linear: Vec3, forward: Vec3, dt: f32) -> Vec3 {
        let lateral_axis = Vec3::new(forward.z, 0.0, -forward.x);
        let lateral = horizontal(linear).dot(&lateral_axis);
        let grip = if self.is_drifting() { self.cfg.drift_lateral_grip } else { self.cfg.lateral_grip };
        forward * self.speed + lateral_axis * (lateral * (-grip * dt).exp())
    }

    /// New yaw rate
    fn steer(&self, yaw_rate: f32) -> f32 {
        let mut input = self.controls.steer();
        if input == 0.0 {
            return yaw_rate * self.cfg.yaw_decay_per_tick;
        }
        if self.speed < -self.cfg.reverse_steer_threshold {
            input = -input;
        }
        let air = if self.grounded { 1.0 } else { self.cfg.air_steer_factor };
        input * self.turn_rate() * air
    }

    /// Orientation handling. Returns a rotation to write back when snapping upright.
    fn orient(&self, state: &BodyState, angular: &mut Vec3, dt: f32) -> Option<Rot> {
        if self.grounded && self.cfg.upright_policy == UprightPolicy::ForceUpright {
            angular.x = 0.0;
            angular.z = 0.0;
            return Some(yaw_only(&state.rotation));
        }

        let up = state.rotation * Vec3::y();
        let tilt = tilt_angle(&state.rotation);
        let axis = normalize_or(up.cross(&world_up()), yaw_forward(&state.rotation));
        *angular += axis * (tilt * self.cfg.stabilize_gain * dt);

        let damping = (-self.cfg.stabilize_damping * dt).exp();
        angular.x *= damping;
        angular.z *= damping;
        None
    }

    fn clamp_horizontal(&self, linear: Vec3) -> Vec3 {
        let cap = if self.speed < 0.0 {
            self.cfg.max_reverse_speed()
        } else {
            self.cfg.effective_max_speed(self.is_boosting)
        };
        let h = horizontal(linear);
        let norm = h.norm();
        if norm > cap && norm > 0.0 {
            with_horizontal(linear, h * (cap / norm))
        } else {
            linear
        }
    }

    // ========== Output ==========

    pub fn snapshot<P: RigidBodyProvider + ?Sized>(&self, provider: &P) -> Result<VehicleSnapshot> {
        let state = require_state(provider, self.body)?;
        Ok(VehicleSnapshot {
            team: self.team,
            position: state.position,
            rotation: state.rotation,
            linear_velocity: state.linear_velocity,
            speed: self.speed,
            boost_amount: self.boost_amount,
            is_boosting: self.is_boosting,
            is_grounded: self.grounded,
            is_drifting: self.is_drifting(),
            jump_ready: self.jump_ready(),
        })
    }
}
