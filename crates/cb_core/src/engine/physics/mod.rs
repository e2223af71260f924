//! Rigid-body capability interface
//!
//! The core never integrates unconstrained bodies or solves contacts itself. It drives
//! a `RigidBodyProvider` (broad-phase, contact solving, integration, ray casts) and only
//! edits forces, impulses and velocities on top of it.
//!
//! `RapierWorld` is the rapier3d-backed provider used by headless runs and tests.

mod rapier_world;

pub use rapier_world::RapierWorld;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::math::{Rot, Vec3};
use crate::error::{contract_violation, CoreError, Result};

/// Handle of a dynamic body inside a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BodyHandle({})", self.0)
    }
}

/// Handle of a static collider (arena geometry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColliderHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Cuboid { half_extents: Vec3 },
    Sphere { radius: f32 },
}

impl Shape {
    /// Radius of the smallest sphere around the centre that covers the shape's extents
    /// along any single axis (largest half-extent for boxes).
    pub fn max_half_extent(&self) -> f32 {
        match *self {
            Shape::Cuboid { half_extents } => half_extents.x.max(half_extents.y).max(half_extents.z),
            Shape::Sphere { radius } => radius,
        }
    }
}

/// Body creation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub shape: Shape,
    /// Zero or less makes the body immovable
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub position: Vec3,
    pub rotation: Rot,
}

impl BodyDesc {
    fn with_shape(shape: Shape, mass: f32) -> Self {
        Self {
            shape,
            mass,
            friction: 0.5,
            restitution: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            position: Vec3::zeros(),
            rotation: Rot::identity(),
        }
    }

    pub fn cuboid(half_extents: Vec3, mass: f32) -> Self {
        Self::with_shape(Shape::Cuboid { half_extents }, mass)
    }

    pub fn sphere(radius: f32, mass: f32) -> Self {
        Self::with_shape(Shape::Sphere { radius }, mass)
    }

    pub fn material(mut self, friction: f32, restitution: f32) -> Self {
        self.friction = friction;
        self.restitution = restitution;
        self
    }

    pub fn damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn at(mut self, position: Vec3, rotation: Rot) -> Self {
        self.position = position;
        self.rotation = rotation;
        self
    }
}

/// Snapshot of a body's kinematic state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    pub position: Vec3,
    pub rotation: Rot,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    #[inline]
    pub fn point_at(&self, toi: f32) -> Vec3 {
        self.origin + self.dir * toi
    }
}

/// Nearest ray hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the ray
    pub toi: f32,
    pub point: Vec3,
    pub normal: Vec3,
    /// `None` when the hit collider is static arena geometry
    pub body: Option<BodyHandle>,
}

/// Capabilities the core requires from a rigid-body world.
///
/// Setters on an unknown handle are no-ops; components check the handle once per tick
/// through `require_state` before writing.
pub trait RigidBodyProvider {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle;

    /// Register static, axis-aligned arena geometry
    fn add_static_box(&mut self, center: Vec3, half_extents: Vec3) -> ColliderHandle;

    fn body_state(&self, body: BodyHandle) -> Option<BodyState>;

    fn set_position(&mut self, body: BodyHandle, position: Vec3);
    fn set_rotation(&mut self, body: BodyHandle, rotation: Rot);
    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3);
    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: Vec3);

    /// Continuous force, accumulated until the next `step`
    fn apply_force(&mut self, body: BodyHandle, force: Vec3);

    /// Instantaneous impulse at the centre of mass
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3);

    /// Nearest hit along `ray` within `max_toi`, ignoring `exclude`
    fn cast_ray(&self, ray: &Ray, max_toi: f32, exclude: Option<BodyHandle>) -> Option<RayHit>;

    /// Integrate the world by `dt` seconds
    fn step(&mut self, dt: f32);

    fn contains(&self, body: BodyHandle) -> bool {
        self.body_state(body).is_some()
    }

    fn set_pose(&mut self, body: BodyHandle, position: Vec3, rotation: Rot) {
        self.set_position(body, position);
        self.set_rotation(body, rotation);
    }

    /// Zero linear and angular velocity
    fn halt(&mut self, body: BodyHandle) {
        self.set_linear_velocity(body, Vec3::zeros());
        self.set_angular_velocity(body, Vec3::zeros());
    }
}

/// Read a body's state, treating a missing body as a precondition violation.
pub fn require_state<P: RigidBodyProvider + ?Sized>(
    provider: &P,
    body: BodyHandle,
) -> Result<BodyState> {
    match provider.body_state(body) {
        Some(state) => Ok(state),
        None => contract_violation(CoreError::BodyNotInitialized(body)),
    }
}
