//! Arena Boundary & Goal Volumes (경기장 경계와 골대)
//!
//! ## Goal 소유권
//! - Blue 골대 (z < -half_length) = Blue 팀이 지키는 골대
//! - Orange 골대 (z > +half_length) = Orange 팀이 지키는 골대
//! - 공이 Blue 골대에 들어감 → Orange 득점, and vice versa
//!
//! The two volumes are mirror images about z = 0 and never overlap, so at most one
//! goal is reported per position.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::config::ArenaConfig;
use crate::engine::math::Vec3;
use crate::engine::physics::{ColliderHandle, RigidBodyProvider};
use crate::engine::team::Team;
use crate::error::{CoreError, Result};

/// Axis-aligned static box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColliderBox {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl ColliderBox {
    fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self { center, half_extents }
    }
}

/// Box volume behind an end wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalVolume {
    /// 이 골대를 지키는 팀
    pub owner: Team,
    pub min: Vec3,
    pub max: Vec3,
}

impl GoalVolume {
    /// Inclusive on every bound
    pub fn contains(&self, p: Vec3) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Centre of the goal mouth on the end wall plane
    pub fn mouth_center(&self) -> Vec3 {
        let z = if self.min.z < 0.0 { self.max.z } else { self.min.z };
        Vec3::new(self.center().x, 0.0, z)
    }

    fn overlaps(&self, other: &GoalVolume) -> bool {
        (0..3).all(|i| self.min[i] <= other.max[i] && other.min[i] <= self.max[i])
    }
}

#[derive(Debug, Clone)]
pub struct Arena {
    cfg: ArenaConfig,
    blue_goal: GoalVolume,
    orange_goal: GoalVolume,
    colliders: Vec<ColliderBox>,
    handles: Vec<ColliderHandle>,
}

impl Arena {
    /// Arena geometry without registering anything
    pub fn new(cfg: &ArenaConfig) -> Result<Self> {
        cfg.validate().map_err(CoreError::InvalidConfig)?;

        let blue_goal = goal_volume(cfg, Team::Blue);
        let orange_goal = goal_volume(cfg, Team::Orange);
        if blue_goal.overlaps(&orange_goal) {
            return Err(CoreError::InvalidConfig("goal volumes overlap".into()));
        }

        Ok(Self {
            cfg: cfg.clone(),
            blue_goal,
            orange_goal,
            colliders: static_colliders(cfg),
            handles: Vec::new(),
        })
    }

    /// Build the arena and register its static colliders with `provider`
    pub fn from_config<P: RigidBodyProvider + ?Sized>(provider: &mut P, cfg: &ArenaConfig) -> Result<Self> {
        let mut arena = Self::new(cfg)?;
        arena.handles = arena
            .colliders
            .iter()
            .map(|b| provider.add_static_box(b.center, b.half_extents))
            .collect();
        debug!(colliders = arena.handles.len(), "arena installed");
        Ok(arena)
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.cfg
    }

    pub fn colliders(&self) -> &[ColliderBox] {
        &self.colliders
    }

    pub fn collider_handles(&self) -> &[ColliderHandle] {
        &self.handles
    }

    /// 팀이 지켜야 할 골대
    pub fn defending_goal(&self, team: Team) -> &GoalVolume {
        match team {
            Team::Blue => &self.blue_goal,
            Team::Orange => &self.orange_goal,
        }
    }

    /// 팀이 공격해야 할 골대
    pub fn attacking_goal(&self, team: Team) -> &GoalVolume {
        self.defending_goal(team.opponent())
    }

    /// 공 위치로 골 체크 - 득점한 팀 반환
    pub fn check_goal(&self, ball_position: Vec3) -> Option<Team> {
        // Blue 골대에 공이 들어감 = Orange 득점
        if self.blue_goal.contains(ball_position) {
            return Some(Team::Orange);
        }
        if self.orange_goal.contains(ball_position) {
            return Some(Team::Blue);
        }
        None
    }

    /// Outside the playable space by more than `margin`, or below the lower bound
    pub fn is_out_of_bounds(&self, p: Vec3, margin: f32) -> bool {
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
            return true;
        }
        let c = &self.cfg;
        p.y < c.lower_bound_y
            || p.x.abs() > c.half_width + margin
            || p.z.abs() > c.half_length + c.goal_depth + margin
            || p.y > c.wall_height + margin
    }
}

fn goal_volume(cfg: &ArenaConfig, owner: Team) -> GoalVolume {
    // Blue defends -Z
    let sign = -owner.attack_sign();
    let near = cfg.half_length * sign;
    let far = (cfg.half_length + cfg.goal_depth) * sign;
    let half_width = cfg.goal_width * 0.5;
    GoalVolume {
        owner,
        min: Vec3::new(-half_width, 0.0, near.min(far)),
        max: Vec3::new(half_width, cfg.goal_height, near.max(far)),
    }
}

/// Floor, ceiling, side walls, end walls split around the goal mouths, and the goal
/// enclosures (back, sides, roof).
fn static_colliders(cfg: &ArenaConfig) -> Vec<ColliderBox> {
    let hw = cfg.half_width;
    let hl = cfg.half_length;
    let wh = cfg.wall_height;
    let t = cfg.wall_thickness;
    let ht = t * 0.5;
    let ghw = cfg.goal_width * 0.5;
    let gh = cfg.goal_height;
    let gd = cfg.goal_depth;

    let mut boxes = vec![
        // Floor (under the goals too), top face at y = 0
        ColliderBox::new(Vec3::new(0.0, -ht, 0.0), Vec3::new(hw + t, ht, hl + gd + t)),
        // Ceiling
        ColliderBox::new(Vec3::new(0.0, wh + ht, 0.0), Vec3::new(hw + t, ht, hl + t)),
    ];

    for side in [-1.0f32, 1.0] {
        boxes.push(ColliderBox::new(
            Vec3::new(side * (hw + ht), wh * 0.5, 0.0),
            Vec3::new(ht, wh * 0.5, hl + t),
        ));
    }

    for end in [-1.0f32, 1.0] {
        let wall_z = end * (hl + ht);

        // End wall on either side of the mouth
        for side in [-1.0f32, 1.0] {
            boxes.push(ColliderBox::new(
                Vec3::new(side * (ghw + hw) * 0.5, wh * 0.5, wall_z),
                Vec3::new((hw - ghw) * 0.5, wh * 0.5, ht),
            ));
        }
        // Above the crossbar
        boxes.push(ColliderBox::new(
            Vec3::new(0.0, (gh + wh) * 0.5, wall_z),
            Vec3::new(ghw, (wh - gh) * 0.5, ht),
        ));

        let goal_mid_z = end * (hl + gd * 0.5);
        // Back of the net
        boxes.push(ColliderBox::new(
            Vec3::new(0.0, gh * 0.5, end * (hl + gd + ht)),
            Vec3::new(ghw + t, gh * 0.5, ht),
        ));
        // Goal side panels
        for side in [-1.0f32, 1.0] {
            boxes.push(ColliderBox::new(
                Vec3::new(side * (ghw + ht), gh * 0.5, goal_mid_z),
                Vec3::new(ht, gh * 0.5, gd * 0.5),
            ));
        }
        // Roof
        boxes.push(ColliderBox::new(
            Vec3::new(0.0, gh + ht, goal_mid_z),
            Vec3::new(ghw + t, ht, gd * 0.5),
        ));
    }

    boxes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::{BodyDesc, RapierWorld, Ray};
    use crate::engine::math::Rot;

    fn arena() -> Arena {
        Arena::new(&ArenaConfig::default()).unwrap()
    }

    #[test]
    fn test_goal_volumes() {
        let arena = arena();
        let blue = arena.defending_goal(Team::Blue);
        assert_eq!(blue.owner, Team::Blue);
        assert_eq!(blue.min, Vec3::new(-10.0, 0.0, -70.0));
        assert_eq!(blue.max, Vec3::new(10.0, 8.0, -60.0));

        let orange = arena.defending_goal(Team::Orange);
        assert_eq!(orange.min.z, 60.0);
        assert_eq!(orange.max.z, 70.0);

        // Blue 팀: 공격 골대 = Orange 골대
        assert_eq!(arena.attacking_goal(Team::Blue).owner, Team::Orange);
        assert_eq!(blue.mouth_center(), Vec3::new(0.0, 0.0, -60.0));
        assert_eq!(orange.mouth_center(), Vec3::new(0.0, 0.0, 60.0));
    }

    #[test]
    fn test_ball_in_blue_goal_credits_orange() {
        let arena = arena();
        assert_eq!(arena.check_goal(Vec3::new(0.0, 4.0, -65.0)), Some(Team::Orange));
        assert_eq!(arena.check_goal(Vec3::new(0.0, 4.0, 65.0)), Some(Team::Blue));
    }

    #[test]
    fn test_arena_centre_is_no_goal() {
        assert_eq!(arena().check_goal(Vec3::new(0.0, 2.0, 0.0)), None);
    }

    #[test]
    fn test_goal_boundaries() {
        let arena = arena();
        // One unit beyond the depth band
        assert_eq!(arena.check_goal(Vec3::new(0.0, 4.0, -71.0)), None);
        // One unit short of the goal line
        assert_eq!(arena.check_goal(Vec3::new(0.0, 4.0, -59.0)), None);
        // Inclusive corners
        assert_eq!(arena.check_goal(Vec3::new(10.0, 8.0, -60.0)), Some(Team::Orange));
        assert_eq!(arena.check_goal(Vec3::new(-10.0, 0.0, 70.0)), Some(Team::Blue));
        // Wide of the post, over the crossbar
        assert_eq!(arena.check_goal(Vec3::new(10.5, 4.0, -65.0)), None);
        assert_eq!(arena.check_goal(Vec3::new(0.0, 8.5, 65.0)), None);
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let cfg = ArenaConfig { goal_width: 90.0, ..Default::default() };
        assert!(matches!(Arena::new(&cfg), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_out_of_bounds() {
        let arena = arena();
        assert!(!arena.is_out_of_bounds(Vec3::new(0.0, 2.0, -65.0), 5.0));
        assert!(arena.is_out_of_bounds(Vec3::new(0.0, -11.0, 0.0), 5.0));
        assert!(arena.is_out_of_bounds(Vec3::new(46.0, 2.0, 0.0), 5.0));
        assert!(arena.is_out_of_bounds(Vec3::new(0.0, 2.0, 76.0), 5.0));
        assert!(arena.is_out_of_bounds(Vec3::new(f32::NAN, 2.0, 0.0), 5.0));
    }

    #[test]
    fn test_colliders_registered() {
        let mut world = RapierWorld::new(20.0);
        let arena = Arena::from_config(&mut world, &ArenaConfig::default()).unwrap();
        assert_eq!(world.static_count(), arena.colliders().len());
        assert_eq!(arena.collider_handles().len(), arena.colliders().len());

        // Floor top at y = 0, also inside the goal
        for z in [0.0, -65.0] {
            let hit = world.cast_ray(&Ray::new(Vec3::new(0.0, 5.0, z), -Vec3::y()), 10.0, None).unwrap();
            assert!(hit.point.y.abs() < 1e-3);
        }
    }

    #[test]
    fn test_goal_mouth_is_open() {
        let mut world = RapierWorld::new(20.0);
        Arena::from_config(&mut world, &ArenaConfig::default()).unwrap();

        // Through the mouth the first thing hit is the back of the net
        let hit = world.cast_ray(&Ray::new(Vec3::new(0.0, 4.0, 0.0), -Vec3::z()), 100.0, None).unwrap();
        assert!((hit.point.z + 70.0).abs() < 1e-3, "z={}", hit.point.z);

        // Beside the mouth the end wall stops it
        let hit = world.cast_ray(&Ray::new(Vec3::new(20.0, 4.0, 0.0), -Vec3::z()), 100.0, None).unwrap();
        assert!((hit.point.z + 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_dropped_ball_rests_on_floor() {
        let mut world = RapierWorld::new(20.0);
        Arena::from_config(&mut world, &ArenaConfig::default()).unwrap();
        let ball = world.create_body(BodyDesc::sphere(2.0, 1.0).material(0.3, 0.5).at(Vec3::new(0.0, 10.0, 0.0), Rot::identity()));
        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }
        let y = world.body_state(ball).unwrap().position.y;
        assert!((y - 2.0).abs() < 0.05, "y={y}");
    }

    // ========== Property-Based Tests ==========

    #[cfg(all(test, feature = "proptest"))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// A position scores for at most one team, and only inside that team's target
            #[test]
            fn prop_goal_is_exclusive(
                x in -20.0f32..20.0f32,
                y in -2.0f32..12.0f32,
                z in -80.0f32..80.0f32
            ) {
                let arena = arena();
                let p = Vec3::new(x, y, z);
                let in_blue = arena.defending_goal(Team::Blue).contains(p);
                let in_orange = arena.defending_goal(Team::Orange).contains(p);
                prop_assert!(!(in_blue && in_orange));
                match arena.check_goal(p) {
                    Some(Team::Orange) => prop_assert!(in_blue),
                    Some(Team::Blue) => prop_assert!(in_orange),
                    None => prop_assert!(!in_blue && !in_orange),
                }
            }
        }
    }
}
