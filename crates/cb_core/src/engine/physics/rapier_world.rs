//! rapier3d-backed rigid-body provider
//!
//! Dynamic bodies get one collider each and continuous collision detection, so a fast
//! ball cannot skip through a wall within one large step. Arena geometry is a set of
//! fixed colliders without a parent body.
//!
//! Friction and restitution combine with `Min` on every pair, so a surface can only
//! soften what the body itself declares.

use rapier3d::na;
use rapier3d::prelude::{
    CCDSolver, CoefficientCombineRule, ColliderBuilder, ColliderSet, DefaultBroadPhase,
    ImpulseJointSet, IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase,
    PhysicsPipeline, QueryFilter, QueryPipeline, Ray as RapierRay, RigidBodyBuilder,
    RigidBodyHandle, RigidBodySet,
};

use super::{BodyDesc, BodyHandle, BodyState, ColliderHandle, Ray, RayHit, RigidBodyProvider, Shape};
use crate::engine::math::{Rot, Vec3};

/// Friction and restitution of arena geometry; `Min` combining hands control to the body
const STATIC_FRICTION: f32 = 1.0;
const STATIC_RESTITUTION: f32 = 1.0;

fn to_na(v: Vec3) -> na::Vector3<f32> {
    na::Vector3::new(v.x, v.y, v.z)
}

fn from_na(v: &na::Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn rot_to_na(r: &Rot) -> na::UnitQuaternion<f32> {
    na::UnitQuaternion::new_normalize(na::Quaternion::new(r.w, r.i, r.j, r.k))
}

fn rot_from_na(r: &na::UnitQuaternion<f32>) -> Rot {
    Rot::new_normalize(nalgebra::Quaternion::new(r.w, r.i, r.j, r.k))
}

/// Reference `RigidBodyProvider` for headless runs and tests
pub struct RapierWorld {
    gravity: na::Vector3<f32>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    /// `BodyHandle(i)` is `handles[i]`
    handles: Vec<RigidBodyHandle>,
    static_count: usize,
}

impl RapierWorld {
    /// World with gravity of `gravity` units/s² along -Y
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity: na::Vector3::new(0.0, -gravity, 0.0),
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            handles: Vec::new(),
            static_count: 0,
        }
    }

    pub fn static_count(&self) -> usize {
        self.static_count
    }

    fn rapier_handle(&self, body: BodyHandle) -> Option<RigidBodyHandle> {
        self.handles.get(body.0 as usize).copied()
    }

    fn body_handle(&self, handle: RigidBodyHandle) -> Option<BodyHandle> {
        self.bodies.get(handle).map(|b| BodyHandle(b.user_data as u32))
    }

    /// Move a body's colliders to its current pose and refresh the query structure,
    /// so ray casts see a teleport before the next step.
    fn sync_colliders(&mut self, handle: RigidBodyHandle) {
        let Some(body) = self.bodies.get(handle) else {
            return;
        };
        for &co in body.colliders() {
            if let Some(collider) = self.colliders.get_mut(co) {
                let offset = collider.position_wrt_parent().copied().unwrap_or_else(na::Isometry3::identity);
                collider.set_position(body.position() * offset);
            }
        }
        self.query_pipeline.update(&self.bodies, &self.colliders);
    }
}

impl RigidBodyProvider for RapierWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.handles.len() as u32);
        let pose = na::Isometry3::from_parts(
            na::Translation3::from(to_na(desc.position)),
            rot_to_na(&desc.rotation),
        );

        let builder = if desc.mass > 0.0 {
            RigidBodyBuilder::dynamic().ccd_enabled(true)
        } else {
            RigidBodyBuilder::fixed()
        };
        let body = builder
            .position(pose)
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .user_data(u128::from(handle.0))
            .build();

        let collider = match desc.shape {
            Shape::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            Shape::Sphere { radius } => ColliderBuilder::ball(radius),
        };
        let collider = collider
            .friction(desc.friction)
            .restitution(desc.restitution)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .restitution_combine_rule(CoefficientCombineRule::Min)
            .mass(desc.mass.max(0.0))
            .build();

        let rb = self.bodies.insert(body);
        self.colliders.insert_with_parent(collider, rb, &mut self.bodies);
        if let Some(body) = self.bodies.get_mut(rb) {
            body.recompute_mass_properties_from_colliders(&self.colliders);
        }
        self.handles.push(rb);
        self.sync_colliders(rb);
        handle
    }

    fn add_static_box(&mut self, center: Vec3, half_extents: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(to_na(center))
            .friction(STATIC_FRICTION)
            .restitution(STATIC_RESTITUTION)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .restitution_combine_rule(CoefficientCombineRule::Min)
            .build();
        self.colliders.insert(collider);
        self.query_pipeline.update(&self.bodies, &self.colliders);
        self.static_count += 1;
        ColliderHandle((self.static_count - 1) as u32)
    }

    fn body_state(&self, body: BodyHandle) -> Option<BodyState> {
        let b = self.bodies.get(self.rapier_handle(body)?)?;
        Some(BodyState {
            position: from_na(b.translation()),
            rotation: rot_from_na(b.rotation()),
            linear_velocity: from_na(b.linvel()),
            angular_velocity: from_na(b.angvel()),
        })
    }

    fn set_position(&mut self, body: BodyHandle, position: Vec3) {
        let Some(rb) = self.rapier_handle(body) else {
            return;
        };
        if let Some(b) = self.bodies.get_mut(rb) {
            b.set_translation(to_na(position), true);
        }
        self.sync_colliders(rb);
    }

    fn set_rotation(&mut self, body: BodyHandle, rotation: Rot) {
        let Some(rb) = self.rapier_handle(body) else {
            return;
        };
        if let Some(b) = self.bodies.get_mut(rb) {
            b.set_rotation(rot_to_na(&rotation), true);
        }
        self.sync_colliders(rb);
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3) {
        if let Some(b) = self.rapier_handle(body).and_then(|rb| self.bodies.get_mut(rb)) {
            b.set_linvel(to_na(velocity), true);
        }
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: Vec3) {
        if let Some(b) = self.rapier_handle(body).and_then(|rb| self.bodies.get_mut(rb)) {
            b.set_angvel(to_na(velocity), true);
        }
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec3) {
        if let Some(b) = self.rapier_handle(body).and_then(|rb| self.bodies.get_mut(rb)) {
            b.add_force(to_na(force), true);
        }
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3) {
        if let Some(b) = self.rapier_handle(body).and_then(|rb| self.bodies.get_mut(rb)) {
            b.apply_impulse(to_na(impulse), true);
        }
    }

    fn cast_ray(&self, ray: &Ray, max_toi: f32, exclude: Option<BodyHandle>) -> Option<RayHit> {
        let mut filter = QueryFilter::default();
        if let Some(rb) = exclude.and_then(|b| self.rapier_handle(b)) {
            filter = filter.exclude_rigid_body(rb);
        }
        let query = RapierRay::new(na::Point3::from(to_na(ray.origin)), to_na(ray.dir));
        let (collider, hit) = self.query_pipeline.cast_ray_and_get_normal(
            &self.bodies,
            &self.colliders,
            &query,
            max_toi,
            true,
            filter,
        )?;

        let body = self
            .colliders
            .get(collider)
            .and_then(|c| c.parent())
            .and_then(|rb| self.body_handle(rb));
        Some(RayHit { toi: hit.time_of_impact, point: ray.point_at(hit.time_of_impact), normal: from_na(&hit.normal), body })
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        // rapier keeps user forces across steps
        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
        }
    }
}
