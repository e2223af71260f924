//! Vector helpers shared by the controller, resolver and AI
//!
//! Y is up. A vehicle's local forward is +Z, so yaw θ maps to forward `(sin θ, 0, cos θ)`.

use nalgebra::{UnitQuaternion, Vector3};

pub type Vec3 = Vector3<f32>;
pub type Rot = UnitQuaternion<f32>;

/// Below this squared length a direction is considered degenerate
pub const DIR_EPSILON_SQ: f32 = 1.0e-8;

#[inline]
pub fn world_up() -> Vec3 {
    Vec3::y()
}

/// Normalize, substituting `fallback` for a degenerate (zero/NaN) vector.
#[inline]
pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let len_sq = v.norm_squared();
    if len_sq.is_finite() && len_sq > DIR_EPSILON_SQ {
        v / len_sq.sqrt()
    } else {
        fallback
    }
}

/// Horizontal (XZ) part of a vector
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Replace the horizontal part of `v`, keeping its vertical component
#[inline]
pub fn with_horizontal(v: Vec3, h: Vec3) -> Vec3 {
    Vec3::new(h.x, v.y, h.z)
}

/// Heading angle about +Y.
///
/// When the nose points straight up or down the forward vector has no horizontal
/// part; the body's up vector then carries the heading instead.
pub fn yaw_of(rot: &Rot) -> f32 {
    let fwd = rot * Vec3::z();
    if fwd.x * fwd.x + fwd.z * fwd.z > DIR_EPSILON_SQ {
        return fwd.x.atan2(fwd.z);
    }
    let up = rot * Vec3::y();
    let (hx, hz) = if fwd.y > 0.0 { (-up.x, -up.z) } else { (up.x, up.z) };
    if hx * hx + hz * hz > DIR_EPSILON_SQ {
        hx.atan2(hz)
    } else {
        0.0
    }
}

/// Yaw-only frame: the rotation with roll and pitch discarded
#[inline]
pub fn yaw_only(rot: &Rot) -> Rot {
    yaw_rotation(yaw_of(rot))
}

#[inline]
pub fn yaw_rotation(yaw: f32) -> Rot {
    Rot::from_axis_angle(&Vector3::y_axis(), yaw)
}

/// Unit forward vector of the yaw-only frame (always horizontal)
#[inline]
pub fn yaw_forward(rot: &Rot) -> Vec3 {
    let yaw = yaw_of(rot);
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Angle (rad) between the body's up axis and world up
#[inline]
pub fn tilt_angle(rot: &Rot) -> f32 {
    let up = rot * Vec3::y();
    up.dot(&world_up()).clamp(-1.0, 1.0).acos()
}

/// Move `current` toward `target` by at most `max_delta`, landing exactly on target
#[inline]
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

/// Wrap an angle into (-π, π]
#[inline]
pub fn wrap_angle(a: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut a = (a + PI).rem_euclid(TAU) - PI;
    if a <= -PI {
        a += TAU;
    }
    a
}
