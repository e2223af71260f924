//! Collision Configuration (차량-공 충돌 튜닝)
//!
//! Arcade impulse table for vehicle→ball hits. None of these are physically derived;
//! they are balance knobs kept apart from the contact geometry.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Slack added to the bounding-sphere reach, so a contact the provider already
    /// separated still registers (default: 0.5)
    pub contact_margin: f32,
    /// Ball impulse per unit of vehicle speed (default: 1.2)
    pub hit_coefficient: f32,
    /// Extra impulse fraction for a fully head-on hit (default: 1.0)
    pub directness_bonus: f32,
    /// Vehicle speed above which a direct hit pops the ball up (default: 10.0)
    pub popup_speed_threshold: f32,
    /// Minimum directness for pop-up (default: 0.5)
    pub popup_directness_threshold: f32,
    /// Upward impulse per unit of vehicle speed (default: 0.4)
    pub popup_factor: f32,
    /// Upward impulse cap (default: 8.0)
    pub popup_max: f32,
    /// Vehicle bounce-back as a fraction of the ball impulse (default: 0.1)
    pub vehicle_recoil_ratio: f32,
    /// Seconds before the same vehicle can hit the ball again (default: 0.1)
    pub rehit_cooldown: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            contact_margin: 0.5,
            hit_coefficient: 1.2,
            directness_bonus: 1.0,
            popup_speed_threshold: 10.0,
            popup_directness_threshold: 0.5,
            popup_factor: 0.4,
            popup_max: 8.0,
            vehicle_recoil_ratio: 0.1,
            rehit_cooldown: 0.1,
        }
    }
}

impl CollisionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.contact_margin < 0.0 {
            return Err("collision.contact_margin must be non-negative".into());
        }
        if self.hit_coefficient < 0.0 || self.directness_bonus < 0.0 {
            return Err("collision impulse coefficients must be non-negative".into());
        }
        if self.popup_max < 0.0 || self.popup_factor < 0.0 {
            return Err("collision pop-up values must be non-negative".into());
        }
        if !(0.0..=1.0).contains(&self.vehicle_recoil_ratio) {
            return Err("collision.vehicle_recoil_ratio must be within [0, 1]".into());
        }
        if self.rehit_cooldown < 0.0 {
            return Err("collision.rehit_cooldown must be non-negative".into());
        }
        Ok(())
    }
}
