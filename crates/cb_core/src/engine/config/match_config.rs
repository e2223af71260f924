//! Match Rules Configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Regulation time in seconds (default: 300.0)
    pub match_duration: f32,
    /// Countdown before kickoff and after each goal (default: 3.0)
    pub countdown_duration: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { match_duration: 300.0, countdown_duration: 3.0 }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.match_duration > 0.0) {
            return Err("match.match_duration must be positive".into());
        }
        if self.countdown_duration < 0.0 {
            return Err("match.countdown_duration must be non-negative".into());
        }
        Ok(())
    }
}
