pub mod ai; // Ball-chasing intent source (steering: seek + heading error)
pub mod arena; // Static geometry, goal volumes, out-of-bounds test
pub mod ball;
pub mod collision; // Vehicle↔Ball hit response
pub mod config; // Tuning configuration + presets
pub mod controls; // Per-tick intents (ControlState / ControlPatch)
pub mod match_state; // Countdown / running / paused / over + score
pub mod math;
pub mod physics; // RigidBodyProvider seam + rapier3d provider
pub mod physics_constants;
pub mod simulation; // Tick orchestration
pub mod snapshot; // Read-only presentation state
pub mod team;
pub mod timestep; // Frame delta clamp
pub mod vehicle; // Vehicle controller

pub use ai::{heading_error, seek, AiDriver};
pub use arena::{Arena, ColliderBox, GoalVolume};
pub use ball::Ball;
pub use collision::{spheres_overlap, BallHit, BallHitInfo, CollisionResolver};
pub use config::{
    AiConfig, ArenaConfig, BallConfig, CollisionConfig, EngineConfig, MatchConfig, UprightPolicy,
    VehicleConfig,
};
pub use controls::{ControlPatch, ControlState};
pub use match_state::{MatchClock, MatchPhase, Score};
pub use math::{Rot, Vec3};
pub use physics::{
    BodyDesc, BodyHandle, BodyState, ColliderHandle, RapierWorld, Ray, RayHit, RigidBodyProvider,
    Shape,
};
pub use simulation::{Driver, GoalEvent, Simulation, TickReport};
pub use snapshot::{BallSnapshot, FrameSnapshot, VehicleSnapshot};
pub use team::Team;
pub use timestep::{clamp_frame_dt, MAX_FRAME_DT, NOMINAL_DT};
pub use vehicle::{spawn_pose, turn_rate_for, Vehicle, MAX_BOOST};
