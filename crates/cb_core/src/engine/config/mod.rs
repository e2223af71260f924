//! # Engine Configuration Module
//!
//! 모든 튜닝 상수를 중앙에서 관리하는 설정 시스템.
//!
//! The controller was tuned iteratively (accel, friction and boost drifted between
//! builds), so every knob lives here instead of in scattered literals.
//!
//! ## Presets
//! - `default()` / `realistic()`: baseline feel
//! - `arcade()`: faster cars, harder hits
//! - `simulation()`: tamer speeds, no pop-ups
//! - `unlimited_boost()`: boost never drains
//! - `deterministic()`: ball spawns at rest (tests, replays)
//!
//! ## 사용법
//! ```rust
//! use cb_core::engine::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! let arcade = EngineConfig::arcade();
//! assert!(arcade.validate().is_ok());
//! ```

mod ai_config;
mod arena_config;
mod ball_config;
mod collision_config;
mod match_config;
mod vehicle_config;

pub use ai_config::AiConfig;
pub use arena_config::ArenaConfig;
pub use ball_config::BallConfig;
pub use collision_config::CollisionConfig;
pub use match_config::MatchConfig;
pub use vehicle_config::{UprightPolicy, VehicleConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for ball spawn randomisation
    pub seed: u64,
    pub vehicle: VehicleConfig,
    pub collision: CollisionConfig,
    pub ball: BallConfig,
    pub arena: ArenaConfig,
    #[serde(rename = "match")]
    pub match_rules: MatchConfig,
    pub ai: AiConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            vehicle: VehicleConfig::default(),
            collision: CollisionConfig::default(),
            ball: BallConfig::default(),
            arena: ArenaConfig::default(),
            match_rules: MatchConfig::default(),
            ai: AiConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn realistic() -> Self {
        Self::default()
    }

    /// 아케이드 스타일 (더 빠르고 더 강한 슛)
    pub fn arcade() -> Self {
        let mut cfg = Self::default();
        cfg.vehicle.max_speed = 36.0;
        cfg.vehicle.accel = 18.0;
        cfg.vehicle.boost_max_speed_multiplier = 2.0;
        cfg.vehicle.drift_turn_multiplier = 2.0;
        cfg.collision.hit_coefficient = 1.6;
        cfg.collision.popup_max = 12.0;
        cfg.ball.restitution = 0.9;
        cfg
    }

    pub fn simulation() -> Self {
        let mut cfg = Self::default();
        cfg.vehicle.max_speed = 24.0;
        cfg.vehicle.accel = 8.0;
        cfg.vehicle.boost_max_speed_multiplier = 1.25;
        cfg.vehicle.drift_turn_multiplier = 1.6;
        cfg.collision.hit_coefficient = 0.9;
        cfg.collision.popup_max = 0.0;
        cfg
    }

    /// Boost never drains
    pub fn unlimited_boost() -> Self {
        let mut cfg = Self::default();
        cfg.vehicle.boost_consumption = 0.0;
        cfg
    }

    /// 테스트용 (무작위성 제거)
    pub fn deterministic() -> Self {
        let mut cfg = Self::default();
        cfg.seed = 0;
        cfg.ball.spawn_horizontal_speed = 0.0;
        cfg.ball.spawn_vertical_speed = 0.0;
        cfg
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "default" | "realistic" => Some(Self::realistic()),
            "arcade" => Some(Self::arcade()),
            "simulation" => Some(Self::simulation()),
            "unlimited_boost" => Some(Self::unlimited_boost()),
            "deterministic" => Some(Self::deterministic()),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.vehicle
            .validate()
            .and_then(|_| self.collision.validate())
            .and_then(|_| self.ball.validate())
            .and_then(|_| self.arena.validate())
            .and_then(|_| self.match_rules.validate())
            .and_then(|_| self.ai.validate())
            .map_err(CoreError::InvalidConfig)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            other => Err(CoreError::InvalidConfig(format!(
                "unsupported config extension: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_presets_are_valid() {
        for name in ["default", "arcade", "simulation", "unlimited_boost", "deterministic"] {
            let cfg = EngineConfig::preset(name).unwrap();
            assert!(cfg.validate().is_ok(), "{name} preset invalid");
        }
        assert!(EngineConfig::preset("nope").is_none());
    }

    #[test]
    fn test_arcade_is_faster() {
        let realistic = EngineConfig::realistic();
        let arcade = EngineConfig::arcade();
        assert!(arcade.vehicle.max_speed > realistic.vehicle.max_speed);
        assert!(arcade.collision.hit_coefficient > realistic.collision.hit_coefficient);
    }

    #[test]
    fn test_unlimited_boost_disables_consumption() {
        assert_eq!(EngineConfig::unlimited_boost().vehicle.boost_consumption, 0.0);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "vehicle:\n  max_speed: 40.0\nmatch:\n  match_duration: 120.0\n";
        let cfg = EngineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.vehicle.max_speed, 40.0);
        assert_eq!(cfg.vehicle.accel, VehicleConfig::default().accel);
        assert_eq!(cfg.match_rules.match_duration, 120.0);
        assert_eq!(cfg.seed, 42);
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = EngineConfig::from_json_str(r#"{"vehicle": {"high_speed_turn_floor": 0.3}}"#)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_nan_from_yaml_rejected() {
        let err = EngineConfig::from_yaml_str("ball:\n  spawn_horizontal_speed: .nan\n").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
        let err = EngineConfig::from_yaml_str("vehicle:\n  lateral_grip: .nan\n").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_roundtrip_through_yaml() {
        let cfg = EngineConfig::arcade();
        let yaml = cfg.to_yaml_string().unwrap();
        let parsed = EngineConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.vehicle.max_speed, cfg.vehicle.max_speed);
        assert_eq!(parsed.vehicle.upright_policy, UprightPolicy::ForceUpright);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"seed": 7, "ball": {{"max_speed": 50.0}}}}"#).unwrap();
        let cfg = EngineConfig::load(file.path()).unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.ball.max_speed, 50.0);
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(EngineConfig::load(file.path()), Err(CoreError::InvalidConfig(_))));
    }
}
