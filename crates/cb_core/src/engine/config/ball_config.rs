//! Ball Configuration

use serde::{Deserialize, Serialize};

use crate::engine::physics_constants::ball;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    pub mass: f32,
    /// Bounciness (default: 0.8)
    pub restitution: f32,
    pub friction: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Spawn height above the centre spot (default: 10.0)
    pub spawn_height: f32,
    /// Horizontal spawn velocity range, ± (default: 5.0)
    pub spawn_horizontal_speed: f32,
    /// Upward spawn velocity range, 0.. (default: 5.0)
    pub spawn_vertical_speed: f32,
    /// Hard speed cap applied every tick (default: 60.0)
    pub max_speed: f32,
    /// Slack beyond the arena walls before the ball counts as lost (default: 5.0)
    pub out_of_bounds_margin: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: ball::RADIUS,
            mass: ball::MASS,
            restitution: ball::RESTITUTION,
            friction: ball::FRICTION,
            linear_damping: ball::LINEAR_DAMPING,
            angular_damping: ball::ANGULAR_DAMPING,
            spawn_height: ball::SPAWN_HEIGHT,
            spawn_horizontal_speed: ball::SPAWN_HORIZONTAL_SPEED,
            spawn_vertical_speed: ball::SPAWN_VERTICAL_SPEED,
            max_speed: 60.0,
            out_of_bounds_margin: 5.0,
        }
    }
}

impl BallConfig {
    pub fn validate(&self) -> Result<(), String> {
        let positive = [("radius", self.radius), ("mass", self.mass), ("max_speed", self.max_speed)];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(format!("ball.{name} must be positive, got {value}"));
            }
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err("ball.restitution must be within [0, 1]".into());
        }
        let non_negative = [
            ("friction", self.friction),
            ("linear_damping", self.linear_damping),
            ("angular_damping", self.angular_damping),
            ("spawn_height", self.spawn_height),
            ("spawn_horizontal_speed", self.spawn_horizontal_speed),
            ("spawn_vertical_speed", self.spawn_vertical_speed),
            ("out_of_bounds_margin", self.out_of_bounds_margin),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(format!("ball.{name} must be non-negative, got {value}"));
            }
        }
        Ok(())
    }
}
