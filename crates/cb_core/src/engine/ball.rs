//! Ball Entity
//!
//! A dynamic sphere owned by the provider. Kickoff velocity is drawn from a seeded
//! `ChaCha8Rng`, so the same seed replays the same kickoffs.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::engine::arena::Arena;
use crate::engine::config::BallConfig;
use crate::engine::math::{Rot, Vec3};
use crate::engine::physics::{require_state, BodyDesc, BodyHandle, BodyState, RigidBodyProvider};
use crate::engine::snapshot::BallSnapshot;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Ball {
    body: BodyHandle,
    cfg: BallConfig,
    rng: ChaCha8Rng,
}

impl Ball {
    /// Create the ball body above the centre spot, at rest
    pub fn spawn<P: RigidBodyProvider + ?Sized>(provider: &mut P, cfg: BallConfig, seed: u64) -> Self {
        let desc = BodyDesc::sphere(cfg.radius, cfg.mass)
            .material(cfg.friction, cfg.restitution)
            .damping(cfg.linear_damping, cfg.angular_damping)
            .at(Vec3::new(0.0, cfg.spawn_height, 0.0), Rot::identity());
        let body = provider.create_body(desc);
        debug!(%body, seed, "ball spawned");
        Self { body, cfg, rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn radius(&self) -> f32 {
        self.cfg.radius
    }

    pub fn config(&self) -> &BallConfig {
        &self.cfg
    }

    pub fn spawn_position(&self) -> Vec3 {
        Vec3::new(0.0, self.cfg.spawn_height, 0.0)
    }

    pub fn state<P: RigidBodyProvider + ?Sized>(&self, provider: &P) -> Result<BodyState> {
        require_state(provider, self.body)
    }

    /// Back to the spawn point with a fresh random kickoff velocity and no spin
    pub fn reset<P: RigidBodyProvider + ?Sized>(&mut self, provider: &mut P) -> Result<()> {
        require_state(provider, self.body)?;
        let velocity = self.kickoff_velocity();
        provider.set_pose(self.body, self.spawn_position(), Rot::identity());
        provider.set_linear_velocity(self.body, velocity);
        provider.set_angular_velocity(self.body, Vec3::zeros());
        debug!(vx = velocity.x, vy = velocity.y, vz = velocity.z, "ball reset");
        Ok(())
    }

    fn kickoff_velocity(&mut self) -> Vec3 {
        let h = self.cfg.spawn_horizontal_speed;
        let v = self.cfg.spawn_vertical_speed;
        Vec3::new(
            self.rng.gen_range(-h..=h),
            self.rng.gen_range(0.0..=v),
            self.rng.gen_range(-h..=h),
        )
    }

    /// Cap the ball's speed. Returns true if it was clamped.
    pub fn clamp_speed<P: RigidBodyProvider + ?Sized>(&self, provider: &mut P) -> Result<bool> {
        let state = require_state(provider, self.body)?;
        let speed = state.linear_velocity.norm();
        if speed <= self.cfg.max_speed {
            return Ok(false);
        }
        provider.set_linear_velocity(self.body, state.linear_velocity * (self.cfg.max_speed / speed));
        Ok(true)
    }

    /// Reset the ball when it left the arena. Returns true if it was reset.
    pub fn recover_if_out_of_bounds<P: RigidBodyProvider + ?Sized>(
        &mut self,
        provider: &mut P,
        arena: &Arena,
    ) -> Result<bool> {
        let p = require_state(provider, self.body)?.position;
        if !arena.is_out_of_bounds(p, self.cfg.out_of_bounds_margin) {
            return Ok(false);
        }
        warn!(x = p.x, y = p.y, z = p.z, "ball out of bounds, resetting");
        self.reset(provider)?;
        Ok(true)
    }

    pub fn snapshot<P: RigidBodyProvider + ?Sized>(&self, provider: &P) -> Result<BallSnapshot> {
        let state = require_state(provider, self.body)?;
        Ok(BallSnapshot {
            position: state.position,
            linear_velocity: state.linear_velocity,
            angular_velocity: state.angular_velocity,
            radius: self.cfg.radius,
        })
    }
}
