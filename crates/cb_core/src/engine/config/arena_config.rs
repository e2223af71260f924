//! Arena Configuration (경기장 / 골대 치수)

use serde::{Deserialize, Serialize};

use crate::engine::physics_constants::{arena, goal, world};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub half_width: f32,
    pub half_length: f32,
    pub wall_height: f32,
    pub wall_thickness: f32,
    pub goal_width: f32,
    pub goal_height: f32,
    pub goal_depth: f32,
    /// Gravity magnitude along -Y (default: 20.0)
    pub gravity: f32,
    /// Lower world bound for out-of-bounds recovery (default: -10.0)
    pub lower_bound_y: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            half_width: arena::HALF_WIDTH,
            half_length: arena::HALF_LENGTH,
            wall_height: arena::WALL_HEIGHT,
            wall_thickness: arena::WALL_THICKNESS,
            goal_width: goal::WIDTH,
            goal_height: goal::HEIGHT,
            goal_depth: goal::DEPTH,
            gravity: world::GRAVITY,
            lower_bound_y: world::LOWER_BOUND_Y,
        }
    }
}

impl ArenaConfig {
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("half_width", self.half_width),
            ("half_length", self.half_length),
            ("wall_height", self.wall_height),
            ("wall_thickness", self.wall_thickness),
            ("goal_width", self.goal_width),
            ("goal_height", self.goal_height),
            ("goal_depth", self.goal_depth),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(format!("arena.{name} must be positive, got {value}"));
            }
        }
        if self.goal_width >= self.half_width * 2.0 {
            return Err("arena.goal_width must be narrower than the arena".into());
        }
        if self.goal_height >= self.wall_height {
            return Err("arena.goal_height must be lower than the walls".into());
        }
        if self.lower_bound_y >= 0.0 {
            return Err("arena.lower_bound_y must be below the floor".into());
        }
        Ok(())
    }
}
