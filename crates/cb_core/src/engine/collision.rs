//! Vehicle↔Ball Collision Resolver (차량-공 충돌)
//!
//! Turns a vehicle/ball contact into the arcade hit response, on top of whatever plain
//! contact the provider already resolved.
//!
//! ## Contact
//! Bounding spheres: centre distance < vehicle radius (largest half-extent) + ball radius
//! + `contact_margin`.
//!
//! ## Response
//! - normal = vehicle centre → ball centre
//! - impulse = vehicle speed × `hit_coefficient` × (1 + `directness_bonus` × max(directness, 0))
//! - pop-up: extra upward impulse for fast, direct hits, capped at `popup_max`
//! - recoil: `vehicle_recoil_ratio` of the ball impulse back onto the vehicle
//!
//! `compute` is pure. Callers resolve a vehicle/ball pair at most once per tick; the
//! simulation additionally gates repeat hits with `rehit_cooldown`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::ball::Ball;
use crate::engine::config::CollisionConfig;
use crate::engine::math::{normalize_or, yaw_forward, Vec3};
use crate::engine::physics::{require_state, BodyState, RigidBodyProvider};
use crate::engine::team::Team;
use crate::engine::vehicle::Vehicle;
use crate::error::Result;

/// Outcome of one vehicle→ball contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallHit {
    /// Unit contact normal, vehicle → ball
    pub normal: Vec3,
    /// Vehicle forward · normal, in [-1, 1]
    pub directness: f32,
    pub vehicle_speed: f32,
    /// Impulse on the ball, pop-up included
    pub ball_impulse: Vec3,
    /// Upward part of `ball_impulse` from the pop-up rule
    pub popup: f32,
    /// Impulse on the vehicle
    pub vehicle_impulse: Vec3,
}

impl BallHit {
    pub fn magnitude(&self) -> f32 {
        self.ball_impulse.norm()
    }
}

/// Last touch, kept for attribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallHitInfo {
    pub team: Team,
    /// Simulation tick of the hit
    pub tick: u64,
    /// Ball centre when hit
    pub ball_position: Vec3,
    pub impulse: Vec3,
    pub vehicle_speed: f32,
}

/// Whether two bounding spheres overlap
#[inline]
pub fn spheres_overlap(a: Vec3, ra: f32, b: Vec3, rb: f32) -> bool {
    let reach = ra + rb;
    (b - a).norm_squared() < reach * reach
}

#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    cfg: CollisionConfig,
}

impl CollisionResolver {
    pub fn new(cfg: CollisionConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.cfg
    }

    /// Hit response for the given states, `None` when not in contact
    pub fn compute(
        &self,
        vehicle: &BodyState,
        vehicle_radius: f32,
        ball: &BodyState,
        ball_radius: f32,
    ) -> Option<BallHit> {
        let cfg = &self.cfg;
        if !spheres_overlap(vehicle.position, vehicle_radius + cfg.contact_margin, ball.position, ball_radius) {
            return None;
        }

        let forward = yaw_forward(&vehicle.rotation);
        // Coincident centres: push along the nose
        let normal = normalize_or(ball.position - vehicle.position, forward);
        let directness = forward.dot(&normal).clamp(-1.0, 1.0);

        let speed = vehicle.linear_velocity.norm();
        let speed = if speed.is_finite() { speed } else { 0.0 };

        let magnitude = speed * cfg.hit_coefficient * (1.0 + cfg.directness_bonus * directness.max(0.0));
        let popup = if speed > cfg.popup_speed_threshold && directness > cfg.popup_directness_threshold {
            (speed * cfg.popup_factor).min(cfg.popup_max)
        } else {
            0.0
        };

        Some(BallHit {
            normal,
            directness,
            vehicle_speed: speed,
            ball_impulse: normal * magnitude + Vec3::y() * popup,
            popup,
            vehicle_impulse: -normal * (magnitude * cfg.vehicle_recoil_ratio),
        })
    }

    /// Detect and apply. Returns the hit if the pair was in contact.
    pub fn resolve<P: RigidBodyProvider + ?Sized>(
        &self,
        provider: &mut P,
        vehicle: &mut Vehicle,
        ball: &Ball,
    ) -> Result<Option<BallHit>> {
        let vehicle_state = require_state(provider, vehicle.body())?;
        let ball_state = require_state(provider, ball.body())?;

        let Some(hit) = self.compute(&vehicle_state, vehicle.config().bounding_radius(), &ball_state, ball.radius())
        else {
            return Ok(None);
        };
        self.apply_hit(provider, vehicle, ball, &hit)?;
        Ok(Some(hit))
    }

    /// Push both impulses into the provider
    pub fn apply_hit<P: RigidBodyProvider + ?Sized>(
        &self,
        provider: &mut P,
        vehicle: &mut Vehicle,
        ball: &Ball,
        hit: &BallHit,
    ) -> Result<()> {
        require_state(provider, ball.body())?;
        provider.apply_impulse(ball.body(), hit.ball_impulse);
        vehicle.apply_recoil(provider, hit.vehicle_impulse)?;
        debug!(
            team = %vehicle.team(),
            speed = hit.vehicle_speed,
            directness = hit.directness,
            impulse = hit.magnitude(),
            "ball hit"
        );
        Ok(())
    }
}
