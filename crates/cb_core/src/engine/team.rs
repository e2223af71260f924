//! Team sides
//!
//! - Blue defends the -Z end and attacks +Z
//! - Orange defends the +Z end and attacks -Z

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Blue,
    Orange,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Blue, Team::Orange];

    pub fn opponent(self) -> Team {
        match self {
            Team::Blue => Team::Orange,
            Team::Orange => Team::Blue,
        }
    }

    /// Sign of the Z axis this team attacks toward (+1 for Blue, -1 for Orange)
    pub fn attack_sign(self) -> f32 {
        match self {
            Team::Blue => 1.0,
            Team::Orange => -1.0,
        }
    }

    /// Spawn heading: facing the opponent's goal
    pub fn spawn_yaw(self) -> f32 {
        match self {
            Team::Blue => 0.0,
            Team::Orange => std::f32::consts::PI,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Team::Blue => 0,
            Team::Orange => 1,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Blue => write!(f, "blue"),
            Team::Orange => write!(f, "orange"),
        }
    }
}
