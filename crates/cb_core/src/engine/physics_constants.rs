//! Physics constants for the arena simulation
//!
//! Single source of truth for dimensions. Tunable behaviour (accel, impulses, ...)
//! lives in `engine::config`; these are the fixed geometric facts the defaults derive from.
//!
//! Frame: right-handed, Y up, arena length along Z, width along X, origin at centre of the floor.

/// World-level constants
pub mod world {
    /// Arcade gravity (units/s²), applied on -Y
    pub const GRAVITY: f32 = 20.0;
    /// Anything below this height is out of bounds and gets reset
    pub const LOWER_BOUND_Y: f32 = -10.0;
}

/// Arena dimensions
pub mod arena {
    /// Half of the arena width (X)
    pub const HALF_WIDTH: f32 = 40.0;
    /// Half of the arena length (Z), measured to the end wall plane
    pub const HALF_LENGTH: f32 = 60.0;
    /// Side/end wall height
    pub const WALL_HEIGHT: f32 = 20.0;
    /// Thickness used for static wall boxes
    pub const WALL_THICKNESS: f32 = 2.0;
}

/// Goal dimensions
///
/// Each goal is a box opening in an end wall, extending outward by `DEPTH`.
pub mod goal {
    /// Goal width (X extent)
    pub const WIDTH: f32 = 20.0;
    /// Goal height (crossbar)
    pub const HEIGHT: f32 = 8.0;
    /// Depth beyond the end wall plane
    pub const DEPTH: f32 = 10.0;
    /// Half width, for lateral range checks
    pub const HALF_WIDTH: f32 = WIDTH * 0.5;
}

/// Ball constants
pub mod ball {
    pub const RADIUS: f32 = 2.0;
    pub const MASS: f32 = 1.0;
    /// Bouncy
    pub const RESTITUTION: f32 = 0.8;
    pub const FRICTION: f32 = 0.3;
    pub const LINEAR_DAMPING: f32 = 0.1;
    pub const ANGULAR_DAMPING: f32 = 0.1;
    /// Spawn height above the centre spot
    pub const SPAWN_HEIGHT: f32 = 10.0;
    /// Random spawn velocity bounds (horizontal ±, vertical 0..)
    pub const SPAWN_HORIZONTAL_SPEED: f32 = 5.0;
    pub const SPAWN_VERTICAL_SPEED: f32 = 5.0;
}

/// Vehicle body constants
pub mod vehicle {
    /// Box width (X)
    pub const WIDTH: f32 = 2.0;
    /// Box height (Y)
    pub const HEIGHT: f32 = 1.0;
    /// Box length (Z, forward)
    pub const LENGTH: f32 = 4.0;
    pub const MASS: f32 = 10.0;
    /// Traction comes from the controller; the box itself slides freely
    pub const FRICTION: f32 = 0.0;
    pub const RESTITUTION: f32 = 0.1;
    /// Coasting deceleration replaces body damping
    pub const LINEAR_DAMPING: f32 = 0.0;
    pub const ANGULAR_DAMPING: f32 = 0.3;
    /// Distance of each spawn point from the centre line
    pub const SPAWN_DISTANCE: f32 = 40.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_fits_inside_end_wall() {
        assert!(goal::HALF_WIDTH < arena::HALF_WIDTH);
        assert!(goal::HEIGHT < arena::WALL_HEIGHT);
    }

    #[test]
    fn test_spawn_points_inside_arena() {
        assert!(vehicle::SPAWN_DISTANCE + vehicle::LENGTH < arena::HALF_LENGTH);
        assert!(ball::SPAWN_HEIGHT + ball::RADIUS < arena::WALL_HEIGHT);
    }
}
