//! Simulation - per-tick orchestration (매 틱 실행 순서)
//!
//! ## Tick order
//! 1. clamp the frame delta
//! 2. advance the match clock; skip physics unless running
//! 3. integrate the world (`provider.step`)
//! 4. AI intents → `apply_controls` → out-of-bounds recovery, per vehicle
//! 5. vehicle↔ball hits, gated per vehicle by `rehit_cooldown`
//! 6. ball speed clamp and out-of-bounds recovery
//! 7. goal check → score, kickoff reset, countdown
//!
//! The provider is the only shared mutable resource and nothing here runs concurrently.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::engine::ai::AiDriver;
use crate::engine::arena::Arena;
use crate::engine::ball::Ball;
use crate::engine::collision::{BallHitInfo, CollisionResolver};
use crate::engine::config::EngineConfig;
use crate::engine::controls::ControlPatch;
use crate::engine::match_state::{MatchClock, MatchPhase, Score};
use crate::engine::math::Vec3;
use crate::engine::physics::{require_state, RapierWorld, RigidBodyProvider};
use crate::engine::snapshot::FrameSnapshot;
use crate::engine::team::Team;
use crate::engine::timestep::clamp_frame_dt;
use crate::engine::vehicle::Vehicle;
use crate::error::Result;

/// Who writes a vehicle's intents
#[derive(Debug, Clone)]
pub enum Driver {
    /// Intents arrive through `Simulation::set_controls`
    Human,
    Ai(AiDriver),
}

impl Driver {
    pub fn is_ai(&self) -> bool {
        matches!(self, Driver::Ai(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalEvent {
    pub scoring_team: Team,
    pub score: Score,
    pub ball_position: Vec3,
    /// Last vehicle to touch the ball before the goal
    pub last_touch: Option<BallHitInfo>,
}

/// What happened during one `step`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Simulated ticks so far (countdown / paused frames do not count)
    pub tick: u64,
    /// Clamped delta actually used
    pub dt: f32,
    pub phase: MatchPhase,
    /// Set when the clock changed phase this frame
    pub phase_change: Option<MatchPhase>,
    /// Whether physics ran this frame
    pub simulated: bool,
    pub goal: Option<GoalEvent>,
    pub hits: Vec<BallHitInfo>,
    pub ball_recovered: bool,
}

#[derive(Debug, Clone)]
struct Slot {
    vehicle: Vehicle,
    driver: Driver,
    /// Seconds before this vehicle may hit the ball again
    rehit_remaining: f32,
}

pub struct Simulation<P: RigidBodyProvider> {
    provider: P,
    cfg: EngineConfig,
    arena: Arena,
    ball: Ball,
    /// Indexed by `Team::index()`
    slots: [Slot; 2],
    resolver: CollisionResolver,
    clock: MatchClock,
    tick: u64,
    last_touch: Option<BallHitInfo>,
}

impl Simulation<RapierWorld> {
    /// Simulation on the rapier3d reference provider
    pub fn headless(cfg: EngineConfig) -> Result<Self> {
        let world = RapierWorld::new(cfg.arena.gravity);
        Self::new(world, cfg)
    }
}

impl<P: RigidBodyProvider> Simulation<P> {
    /// Build arena, ball and both vehicles inside `provider`.
    ///
    /// Blue starts human-driven, Orange AI-driven.
    pub fn new(mut provider: P, cfg: EngineConfig) -> Result<Self> {
        cfg.validate()?;

        let arena = Arena::from_config(&mut provider, &cfg.arena)?;
        let ball = Ball::spawn(&mut provider, cfg.ball.clone(), cfg.seed);
        let slots = Team::ALL.map(|team| Slot {
            vehicle: Vehicle::spawn(&mut provider, team, cfg.vehicle.clone()),
            driver: match team {
                Team::Blue => Driver::Human,
                Team::Orange => Driver::Ai(AiDriver::new(cfg.ai.clone())),
            },
            rehit_remaining: 0.0,
        });

        let mut sim = Self {
            provider,
            resolver: CollisionResolver::new(cfg.collision.clone()),
            clock: MatchClock::new(cfg.match_rules.clone()),
            cfg,
            arena,
            ball,
            slots,
            tick: 0,
            last_touch: None,
        };
        sim.reset_kickoff()?;
        info!(seed = sim.cfg.seed, "simulation ready");
        Ok(sim)
    }

    // ========== Accessors ==========

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn vehicle(&self, team: Team) -> &Vehicle {
        &self.slots[team.index()].vehicle
    }

    pub fn driver(&self, team: Team) -> &Driver {
        &self.slots[team.index()].driver
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    pub fn score(&self) -> Score {
        self.clock.score()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn last_touch(&self) -> Option<&BallHitInfo> {
        self.last_touch.as_ref()
    }

    // ========== Control ==========

    pub fn set_driver(&mut self, team: Team, driver: Driver) {
        debug!(%team, ai = driver.is_ai(), "driver changed");
        self.slots[team.index()].driver = driver;
    }

    /// Merge intents for a vehicle. An AI driver overwrites them on its next tick.
    pub fn set_controls(&mut self, team: Team, patch: &ControlPatch) {
        self.slots[team.index()].vehicle.set_controls(patch);
    }

    pub fn pause(&mut self) -> bool {
        self.clock.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.clock.resume()
    }

    /// Ball and vehicles back to their kickoff state
    pub fn reset_kickoff(&mut self) -> Result<()> {
        self.ball.reset(&mut self.provider)?;
        for slot in &mut self.slots {
            slot.vehicle.reset(&mut self.provider, None)?;
            slot.rehit_remaining = 0.0;
        }
        Ok(())
    }

    /// Fresh match: clock, score and kickoff
    pub fn restart_match(&mut self) -> Result<()> {
        self.clock.restart();
        self.tick = 0;
        self.last_touch = None;
        self.reset_kickoff()
    }

    // ========== Tick ==========

    pub fn step(&mut self, frame_dt: f32) -> Result<TickReport> {
        let dt = clamp_frame_dt(frame_dt);
        let phase_change = self.clock.advance(dt);

        let mut report = TickReport {
            tick: self.tick,
            dt,
            phase: self.clock.phase(),
            phase_change,
            simulated: false,
            goal: None,
            hits: Vec::new(),
            ball_recovered: false,
        };
        if !self.clock.is_simulation_active() || dt <= 0.0 {
            return Ok(report);
        }

        self.tick += 1;
        report.tick = self.tick;
        report.simulated = true;

        // Integrate first; everything below reads post-step state
        self.provider.step(dt);

        self.drive_vehicles(dt)?;
        report.hits = self.resolve_hits(dt)?;

        self.ball.clamp_speed(&mut self.provider)?;
        report.ball_recovered = self.ball.recover_if_out_of_bounds(&mut self.provider, &self.arena)?;

        report.goal = self.check_goal()?;
        report.phase = self.clock.phase();
        trace!(tick = self.tick, "tick");
        Ok(report)
    }

    fn drive_vehicles(&mut self, dt: f32) -> Result<()> {
        let ball_state = self.ball.state(&self.provider)?;
        let lower_bound_y = self.cfg.arena.lower_bound_y;

        for slot in &mut self.slots {
            let team = slot.vehicle.team();
            if let Driver::Ai(ai) = &slot.driver {
                let state = require_state(&self.provider, slot.vehicle.body())?;
                let patch = ai.decide(team, &state, &ball_state, &self.arena);
                slot.vehicle.set_controls(&patch);
            }
            slot.vehicle.apply_controls(&mut self.provider, dt)?;
            slot.vehicle.recover_if_out_of_bounds(&mut self.provider, lower_bound_y)?;
        }
        Ok(())
    }

    fn resolve_hits(&mut self, dt: f32) -> Result<Vec<BallHitInfo>> {
        let mut hits = Vec::new();
        for slot in &mut self.slots {
            slot.rehit_remaining = (slot.rehit_remaining - dt).max(0.0);
            if slot.rehit_remaining > 0.0 {
                continue;
            }

            let ball_position = self.ball.state(&self.provider)?.position;
            let Some(hit) = self.resolver.resolve(&mut self.provider, &mut slot.vehicle, &self.ball)? else {
                continue;
            };
            slot.rehit_remaining = self.resolver.config().rehit_cooldown;

            let info = BallHitInfo {
                team: slot.vehicle.team(),
                tick: self.tick,
                ball_position,
                impulse: hit.ball_impulse,
                vehicle_speed: hit.vehicle_speed,
            };
            self.last_touch = Some(info);
            hits.push(info);
        }
        Ok(hits)
    }

    fn check_goal(&mut self) -> Result<Option<GoalEvent>> {
        let ball_position = self.ball.state(&self.provider)?.position;
        let Some(scoring_team) = self.arena.check_goal(ball_position) else {
            return Ok(None);
        };

        let score = self.clock.record_goal(scoring_team);
        let event = GoalEvent { scoring_team, score, ball_position, last_touch: self.last_touch.take() };
        self.reset_kickoff()?;
        Ok(Some(event))
    }

    // ========== Output ==========

    pub fn snapshot(&self) -> Result<FrameSnapshot> {
        let vehicles = self
            .slots
            .iter()
            .map(|slot| slot.vehicle.snapshot(&self.provider))
            .collect::<Result<Vec<_>>>()?;
        Ok(FrameSnapshot {
            tick: self.tick,
            phase: self.clock.phase(),
            score: self.clock.score(),
            time_remaining: self.clock.time_remaining(),
            countdown_remaining: self.clock.countdown_remaining(),
            vehicles,
            ball: self.ball.snapshot(&self.provider)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::MatchConfig;
    use crate::engine::timestep::NOMINAL_DT;

    fn no_countdown() -> EngineConfig {
        let mut cfg = EngineConfig::deterministic();
        cfg.match_rules = MatchConfig { match_duration: 120.0, countdown_duration: 0.0 };
        cfg
    }

    fn human_only(cfg: EngineConfig) -> Simulation<RapierWorld> {
        let mut sim = Simulation::headless(cfg).unwrap();
        sim.set_driver(Team::Orange, Driver::Human);
        sim
    }

    #[test]
    fn test_kickoff_layout() {
        let sim = Simulation::headless(EngineConfig::deterministic()).unwrap();
        let snap = sim.snapshot().unwrap();
        assert_eq!(snap.phase, MatchPhase::Countdown);
        assert_eq!(snap.ball.position, Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(snap.vehicle(Team::Blue).unwrap().position.z, -40.0);
        assert_eq!(snap.vehicle(Team::Orange).unwrap().position.z, 40.0);
        assert!(snap.vehicles.iter().all(|v| v.boost_amount == 100.0 && v.jump_ready));
        assert!(sim.driver(Team::Orange).is_ai());
        assert!(!sim.driver(Team::Blue).is_ai());
    }

    #[test]
    fn test_countdown_skips_physics() {
        let mut sim = Simulation::headless(EngineConfig::deterministic()).unwrap();
        let report = sim.step(NOMINAL_DT).unwrap();
        assert!(!report.simulated);
        assert_eq!(report.tick, 0);
        assert_eq!(sim.snapshot().unwrap().ball.position.y, 10.0);

        // 3 s countdown, then physics runs
        let mut kicked_off = false;
        for _ in 0..200 {
            let report = sim.step(NOMINAL_DT).unwrap();
            if report.phase_change == Some(MatchPhase::Running) {
                kicked_off = true;
                assert!(report.simulated);
            }
        }
        assert!(kicked_off);
        assert!(sim.snapshot().unwrap().ball.position.y < 10.0);
    }

    #[test]
    fn test_stalled_frame_is_clamped() {
        let mut sim = human_only(no_countdown());
        let report = sim.step(5.0).unwrap();
        assert_eq!(report.dt, 0.1);
        assert!((sim.clock().time_remaining() - 119.9).abs() < 1e-3);
    }

    #[test]
    fn test_paused_match_does_not_step() {
        let mut sim = human_only(no_countdown());
        sim.step(NOMINAL_DT).unwrap();
        assert!(sim.pause());
        let before = sim.snapshot().unwrap();
        let report = sim.step(NOMINAL_DT).unwrap();
        assert!(!report.simulated);
        assert_eq!(sim.snapshot().unwrap().ball, before.ball);
        assert!(sim.resume());
        assert!(sim.step(NOMINAL_DT).unwrap().simulated);
    }

    #[test]
    fn test_human_controls_drive_vehicle() {
        let mut sim = human_only(no_countdown());
        sim.set_controls(Team::Blue, &ControlPatch::default().accelerate(true));
        for _ in 0..60 {
            sim.step(NOMINAL_DT).unwrap();
        }
        // 12 u/s² for one second, minus any airborne settling ticks
        let speed = sim.vehicle(Team::Blue).speed();
        assert!(speed > 8.0 && speed <= 12.01, "speed={speed}");
        assert_eq!(sim.vehicle(Team::Orange).speed(), 0.0);
    }

    #[test]
    fn test_goal_in_blue_net_credits_orange() {
        let mut cfg = EngineConfig::deterministic();
        cfg.match_rules.countdown_duration = 0.0;
        let mut sim = human_only(cfg);
        let ball = sim.ball().body();
        sim.provider_mut().set_position(ball, Vec3::new(0.0, 4.0, -65.0));

        let report = sim.step(NOMINAL_DT).unwrap();
        let goal = report.goal.expect("goal");
        assert_eq!(goal.scoring_team, Team::Orange);
        assert_eq!(sim.score(), Score { blue: 0, orange: 1 });
        // Kickoff reset
        assert_eq!(sim.snapshot().unwrap().ball.position, Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(sim.snapshot().unwrap().vehicle(Team::Blue).unwrap().position.z, -40.0);
    }

    #[test]
    fn test_goal_restarts_countdown() {
        let mut sim = human_only(EngineConfig::deterministic());
        for _ in 0..200 {
            sim.step(NOMINAL_DT).unwrap();
        }
        assert_eq!(sim.clock().phase(), MatchPhase::Running);
        let ball = sim.ball().body();
        sim.provider_mut().set_position(ball, Vec3::new(0.0, 4.0, 65.0));
        let report = sim.step(NOMINAL_DT).unwrap();
        assert_eq!(report.goal.map(|g| g.scoring_team), Some(Team::Blue));
        assert_eq!(sim.clock().phase(), MatchPhase::Countdown);
    }

    #[test]
    fn test_ball_hit_is_recorded_once_per_cooldown() {
        let mut sim = human_only(no_countdown());
        let ball = sim.ball().body();
        // Ball on the floor just ahead of the blue car's nose, inside the contact margin
        sim.provider_mut().set_position(ball, Vec3::new(0.0, 2.0, -36.0));
        sim.provider_mut().set_linear_velocity(ball, Vec3::zeros());
        sim.set_controls(Team::Blue, &ControlPatch::default().accelerate(true));

        let mut hits = Vec::new();
        for _ in 0..3 {
            hits.extend(sim.step(NOMINAL_DT).unwrap().hits);
        }
        assert_eq!(hits.len(), 1, "rehit cooldown must gate consecutive ticks");
        assert_eq!(hits[0].team, Team::Blue);
        assert_eq!(sim.last_touch().map(|h| h.team), Some(Team::Blue));
        assert!(sim.provider().body_state(ball).unwrap().linear_velocity.z > 0.0);
    }

    #[test]
    fn test_fast_ball_stays_inside_walls_on_long_frames() {
        // Each wall approached at the speed cap, starting 0.1 from contact
        let launches = [
            (Vec3::new(37.9, 5.0, 0.0), Vec3::new(60.0, 0.0, 0.0)),
            (Vec3::new(-37.9, 5.0, 0.0), Vec3::new(-60.0, 0.0, 0.0)),
            (Vec3::new(20.0, 5.0, 57.9), Vec3::new(0.0, 0.0, 60.0)),
            (Vec3::new(-20.0, 5.0, -57.9), Vec3::new(0.0, 0.0, -60.0)),
        ];
        for (position, velocity) in launches {
            let mut sim = human_only(no_countdown());
            let (half_width, half_length) = (sim.config().arena.half_width, sim.config().arena.half_length);
            let ball = sim.ball().body();
            sim.provider_mut().set_position(ball, position);
            sim.provider_mut().set_linear_velocity(ball, velocity);

            for _ in 0..5 {
                let report = sim.step(0.1).unwrap();
                assert!(!report.ball_recovered, "ball escaped from {position:?}");
                let p = sim.provider().body_state(ball).unwrap().position;
                assert!(p.x.abs() < half_width, "through the side wall from {position:?}: {p:?}");
                assert!(p.z.abs() < half_length, "through the end wall from {position:?}: {p:?}");
            }
        }
    }

    #[test]
    fn test_lost_ball_is_recovered() {
        let mut sim = human_only(no_countdown());
        let ball = sim.ball().body();
        sim.provider_mut().set_position(ball, Vec3::new(0.0, -50.0, 0.0));
        let report = sim.step(NOMINAL_DT).unwrap();
        assert!(report.ball_recovered);
        assert_eq!(sim.snapshot().unwrap().ball.position, Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_match_runs_to_completion() {
        let mut cfg = EngineConfig::deterministic();
        cfg.match_rules = MatchConfig { match_duration: 30.0, countdown_duration: 1.0 };
        let mut sim = Simulation::headless(cfg).unwrap();
        sim.set_driver(Team::Blue, Driver::Ai(AiDriver::default()));

        let mut touches = 0;
        let mut over = false;
        for _ in 0..4000 {
            let report = sim.step(NOMINAL_DT).unwrap();
            touches += report.hits.len();
            if report.phase == MatchPhase::Over {
                over = true;
                break;
            }
        }
        assert!(over);
        assert!(touches > 0, "AI never reached the ball");
        let snap = sim.snapshot().unwrap();
        assert!(snap.ball.position.iter().all(|v| v.is_finite()));
        assert!(snap.vehicles.iter().all(|v| v.position.iter().all(|c| c.is_finite())));
        assert_eq!(sim.clock().winner(), sim.score().leader());
    }

    #[test]
    fn test_restart_match() {
        let mut sim = human_only(no_countdown());
        let ball = sim.ball().body();
        sim.provider_mut().set_position(ball, Vec3::new(0.0, 4.0, -65.0));
        sim.step(NOMINAL_DT).unwrap();
        sim.restart_match().unwrap();
        assert_eq!(sim.score(), Score::default());
        assert_eq!(sim.tick(), 0);
    }

    #[test]
    fn test_snapshot_serialises() {
        let sim = Simulation::headless(EngineConfig::default()).unwrap();
        let json = sim.snapshot().unwrap().to_json().unwrap();
        assert!(json.contains("\"phase\":\"countdown\""));
        assert!(json.contains("\"team\":\"blue\""));
    }
}
