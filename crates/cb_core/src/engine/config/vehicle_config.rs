//! Vehicle Configuration (차량 튜닝 파라미터)
//!
//! Every controller tunable in one place. Units: world units, seconds, radians.

use serde::{Deserialize, Serialize};

use crate::engine::math::Vec3;
use crate::engine::physics_constants::vehicle as body;

/// Orientation policy while grounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UprightPolicy {
    /// Snap to the yaw-only frame and zero roll/pitch spin
    #[default]
    ForceUpright,
    /// Same damped correction as in the air
    Stabilize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    // === Body ===
    /// Box width (X) (default: 2.0)
    pub width: f32,
    /// Box height (Y) (default: 1.0)
    pub height: f32,
    /// Box length (Z) (default: 4.0)
    pub length: f32,
    /// Mass (default: 10.0)
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,

    // === Longitudinal ===
    /// Forward max speed without boost (default: 30.0)
    pub max_speed: f32,
    /// Forward acceleration (default: 12.0)
    pub accel: f32,
    /// Reverse acceleration once stopped (default: 10.0)
    pub reverse_accel: f32,
    /// Deceleration when throttling against the direction of travel (default: 40.0)
    pub brake_decel: f32,
    /// Deceleration with no throttle (default: 8.0)
    pub coast_decel: f32,
    /// Reverse max as a fraction of `max_speed` (default: 0.6)
    pub reverse_speed_ratio: f32,

    // === Boost ===
    /// Extra acceleration while boosting on the ground (default: 20.0)
    pub boost_accel: f32,
    /// Forward force while boosting in the air (default: 150.0)
    pub boost_air_force: f32,
    /// Max speed multiplier while boosting (default: 1.5)
    pub boost_max_speed_multiplier: f32,
    /// Boost drained per second; 0 disables consumption (default: 33.0)
    pub boost_consumption: f32,
    /// Boost regained per second while not boosting (default: 10.0)
    pub boost_recharge: f32,

    // === Steering ===
    /// Yaw rate at standstill (rad/s) (default: 2.5)
    pub base_turn_rate: f32,
    /// Turn effectiveness left at max speed (default: 0.85, must be >= 0.8)
    pub high_speed_turn_floor: f32,
    /// Turn rate multiplier while drifting (default: 1.8)
    pub drift_turn_multiplier: f32,
    /// Airborne yaw rate as a fraction of the grounded rate (default: 0.5)
    pub air_steer_factor: f32,
    /// Backward speed beyond which steering inverts (default: 0.5)
    pub reverse_steer_threshold: f32,
    /// Per-tick yaw spin retention with no steering input (default: 0.95)
    pub yaw_decay_per_tick: f32,

    // === Grip ===
    /// Lateral velocity decay (1/s) (default: 12.0)
    pub lateral_grip: f32,
    /// Lateral velocity decay while drifting (1/s) (default: 1.5)
    pub drift_lateral_grip: f32,

    // === Orientation ===
    pub upright_policy: UprightPolicy,
    /// Proportional gain of the tilt correction (default: 6.0)
    pub stabilize_gain: f32,
    /// Roll/pitch spin damping (1/s) (default: 3.0)
    pub stabilize_damping: f32,

    // === Jump ===
    /// Upward velocity given by a jump (default: 9.0)
    pub jump_velocity: f32,
    /// Seconds between jumps (default: 1.0)
    pub jump_cooldown: f32,

    // === Ground test ===
    /// Ray length beyond the lower face (default: 0.25)
    pub ground_probe: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            width: body::WIDTH,
            height: body::HEIGHT,
            length: body::LENGTH,
            mass: body::MASS,
            friction: body::FRICTION,
            restitution: body::RESTITUTION,
            linear_damping: body::LINEAR_DAMPING,
            angular_damping: body::ANGULAR_DAMPING,

            max_speed: 30.0,
            accel: 12.0,
            reverse_accel: 10.0,
            brake_decel: 40.0,
            coast_decel: 8.0,
            reverse_speed_ratio: 0.6,

            boost_accel: 20.0,
            boost_air_force: 150.0,
            boost_max_speed_multiplier: 1.5,
            boost_consumption: 33.0,
            boost_recharge: 10.0,

            base_turn_rate: 2.5,
            high_speed_turn_floor: 0.85,
            drift_turn_multiplier: 1.8,
            air_steer_factor: 0.5,
            reverse_steer_threshold: 0.5,
            yaw_decay_per_tick: 0.95,

            lateral_grip: 12.0,
            drift_lateral_grip: 1.5,

            upright_policy: UprightPolicy::ForceUpright,
            stabilize_gain: 6.0,
            stabilize_damping: 3.0,

            jump_velocity: 9.0,
            jump_cooldown: 1.0,

            ground_probe: 0.25,
        }
    }
}

impl VehicleConfig {
    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.length) * 0.5
    }

    /// Bounding-sphere radius used for ball contact (largest half-extent)
    pub fn bounding_radius(&self) -> f32 {
        self.width.max(self.height).max(self.length) * 0.5
    }

    /// Max speed for this tick
    pub fn effective_max_speed(&self, boosting: bool) -> f32 {
        if boosting {
            self.max_speed * self.boost_max_speed_multiplier
        } else {
            self.max_speed
        }
    }

    pub fn max_reverse_speed(&self) -> f32 {
        self.max_speed * self.reverse_speed_ratio
    }

    /// Downward ray length measured from the body centre
    pub fn ground_ray_length(&self) -> f32 {
        self.height * 0.5 + self.ground_probe
    }

    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("length", self.length),
            ("mass", self.mass),
            ("max_speed", self.max_speed),
            ("accel", self.accel),
            ("reverse_accel", self.reverse_accel),
            ("brake_decel", self.brake_decel),
            ("coast_decel", self.coast_decel),
            ("base_turn_rate", self.base_turn_rate),
            ("jump_cooldown", self.jump_cooldown),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(format!("vehicle.{name} must be positive, got {value}"));
            }
        }
        if !(0.8..=1.0).contains(&self.high_speed_turn_floor) {
            return Err(format!(
                "vehicle.high_speed_turn_floor must be within [0.8, 1.0], got {}",
                self.high_speed_turn_floor
            ));
        }
        if !(self.reverse_speed_ratio > 0.0 && self.reverse_speed_ratio <= 1.0) {
            return Err(format!(
                "vehicle.reverse_speed_ratio must be within (0, 1], got {}",
                self.reverse_speed_ratio
            ));
        }
        let non_negative = [
            ("friction", self.friction),
            ("restitution", self.restitution),
            ("linear_damping", self.linear_damping),
            ("angular_damping", self.angular_damping),
            ("boost_accel", self.boost_accel),
            ("boost_air_force", self.boost_air_force),
            ("boost_consumption", self.boost_consumption),
            ("boost_recharge", self.boost_recharge),
            ("air_steer_factor", self.air_steer_factor),
            ("reverse_steer_threshold", self.reverse_steer_threshold),
            ("lateral_grip", self.lateral_grip),
            ("drift_lateral_grip", self.drift_lateral_grip),
            ("stabilize_gain", self.stabilize_gain),
            ("stabilize_damping", self.stabilize_damping),
            ("jump_velocity", self.jump_velocity),
            ("ground_probe", self.ground_probe),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(format!("vehicle.{name} must be non-negative, got {value}"));
            }
        }
        let multipliers = [
            ("boost_max_speed_multiplier", self.boost_max_speed_multiplier),
            ("drift_turn_multiplier", self.drift_turn_multiplier),
        ];
        for (name, value) in multipliers {
            if !(value >= 1.0 && value.is_finite()) {
                return Err(format!("vehicle.{name} must be >= 1, got {value}"));
            }
        }
        if !(0.0..=1.0).contains(&self.yaw_decay_per_tick) {
            return Err("vehicle.yaw_decay_per_tick must be within [0, 1]".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(VehicleConfig::default().validate().is_ok());
    }

    #[test]
    fn test_turn_floor_guard() {
        let cfg = VehicleConfig { high_speed_turn_floor: 0.5, ..Default::default() };
        assert!(cfg.validate().unwrap_err().contains("high_speed_turn_floor"));
    }

    #[test]
    fn test_nan_and_infinite_tunables_rejected() {
        let cases = [
            VehicleConfig { lateral_grip: f32::NAN, ..Default::default() },
            VehicleConfig { drift_lateral_grip: -1.0, ..Default::default() },
            VehicleConfig { stabilize_gain: f32::NAN, ..Default::default() },
            VehicleConfig { stabilize_damping: f32::INFINITY, ..Default::default() },
            VehicleConfig { boost_accel: f32::NAN, ..Default::default() },
            VehicleConfig { boost_consumption: f32::NAN, ..Default::default() },
            VehicleConfig { boost_recharge: f32::NAN, ..Default::default() },
            VehicleConfig { boost_max_speed_multiplier: f32::NAN, ..Default::default() },
            VehicleConfig { drift_turn_multiplier: f32::INFINITY, ..Default::default() },
        ];
        for cfg in cases {
            assert!(cfg.validate().is_err(), "accepted {cfg:?}");
        }
        let err = VehicleConfig { lateral_grip: f32::NAN, ..Default::default() }.validate().unwrap_err();
        assert!(err.contains("lateral_grip"), "{err}");
    }

    #[test]
    fn test_effective_max_speed() {
        let cfg = VehicleConfig::default();
        assert_eq!(cfg.effective_max_speed(false), 30.0);
        assert_eq!(cfg.effective_max_speed(true), 45.0);
        assert!((cfg.max_reverse_speed() - 18.0).abs() < 1e-4);
    }

    #[test]
    fn test_geometry_helpers() {
        let cfg = VehicleConfig::default();
        assert_eq!(cfg.bounding_radius(), 2.0);
        assert_eq!(cfg.ground_ray_length(), 0.75);
        assert_eq!(cfg.half_extents(), Vec3::new(1.0, 0.5, 2.0));
    }
}
