//! # cb_core - Arcade Vehicle-Soccer Simulation Core
//!
//! Vehicle controller, vehicle↔ball hit response and goal detection for a two-car
//! arcade soccer game, running on top of any rigid-body world that implements
//! [`engine::physics::RigidBodyProvider`].
//!
//! ## Features
//! - Scalar-speed arcade handling (boost, drift, jump, upright recovery)
//! - Directness-weighted ball hits with pop-up
//! - Inclusive goal volumes, countdown / match clock, kickoff resets
//! - Seeded kickoffs (same seed = same ball launches)
//! - `RapierWorld`: rapier3d provider (continuous collision detection) for headless runs and tests
//!
//! ## 사용법
//! ```rust
//! use cb_core::engine::{ControlPatch, EngineConfig, Simulation, Team, NOMINAL_DT};
//!
//! let mut sim = Simulation::headless(EngineConfig::default()).unwrap();
//! sim.set_controls(Team::Blue, &ControlPatch::default().accelerate(true));
//! let report = sim.step(NOMINAL_DT).unwrap();
//! assert_eq!(report.dt, NOMINAL_DT);
//! ```

// Presets tweak a default config field by field
#![allow(clippy::field_reassign_with_default)]

pub mod engine;
pub mod error;

pub use engine::{
    Arena, Ball, CollisionResolver, ControlPatch, ControlState, Driver, EngineConfig,
    FrameSnapshot, MatchPhase, RapierWorld, RigidBodyProvider, Score, Simulation, Team,
    TickReport, Vehicle,
};
pub use error::{CoreError, Result};
