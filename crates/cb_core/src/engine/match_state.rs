//! Match State - countdown / running / paused / over
//!
//! The physics core only consumes `is_simulation_active()`: no stepping happens while
//! counting down, paused or over. Goals feed back through `record_goal`.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::config::MatchConfig;
use crate::engine::team::Team;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    Countdown,
    Running,
    Paused,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub blue: u32,
    pub orange: u32,
}

impl Score {
    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::Blue => self.blue,
            Team::Orange => self.orange,
        }
    }

    pub fn credit(&mut self, team: Team) {
        match team {
            Team::Blue => self.blue += 1,
            Team::Orange => self.orange += 1,
        }
    }

    /// Leading team, `None` on a draw
    pub fn leader(&self) -> Option<Team> {
        use std::cmp::Ordering;
        match self.blue.cmp(&self.orange) {
            Ordering::Greater => Some(Team::Blue),
            Ordering::Less => Some(Team::Orange),
            Ordering::Equal => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchClock {
    cfg: MatchConfig,
    phase: MatchPhase,
    /// Phase to return to on resume
    paused_from: Option<MatchPhase>,
    time_remaining: f32,
    countdown_remaining: f32,
    score: Score,
}

impl MatchClock {
    /// New match, starting with the kickoff countdown
    pub fn new(cfg: MatchConfig) -> Self {
        let mut clock = Self {
            phase: MatchPhase::Countdown,
            paused_from: None,
            time_remaining: cfg.match_duration,
            countdown_remaining: 0.0,
            score: Score::default(),
            cfg,
        };
        clock.start_countdown();
        clock
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    pub fn countdown_remaining(&self) -> f32 {
        self.countdown_remaining
    }

    pub fn is_simulation_active(&self) -> bool {
        self.phase == MatchPhase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == MatchPhase::Over
    }

    fn start_countdown(&mut self) {
        if self.cfg.countdown_duration > 0.0 {
            self.phase = MatchPhase::Countdown;
            self.countdown_remaining = self.cfg.countdown_duration;
        } else {
            self.phase = MatchPhase::Running;
            self.countdown_remaining = 0.0;
        }
    }

    /// Advance the clock. Returns the new phase if it changed.
    pub fn advance(&mut self, dt: f32) -> Option<MatchPhase> {
        match self.phase {
            MatchPhase::Countdown => {
                self.countdown_remaining -= dt;
                if self.countdown_remaining <= 0.0 {
                    self.countdown_remaining = 0.0;
                    self.phase = MatchPhase::Running;
                    info!(time_remaining = self.time_remaining, "kickoff");
                    return Some(MatchPhase::Running);
                }
                None
            }
            MatchPhase::Running => {
                self.time_remaining -= dt;
                if self.time_remaining <= 0.0 {
                    self.time_remaining = 0.0;
                    self.phase = MatchPhase::Over;
                    info!(blue = self.score.blue, orange = self.score.orange, "match over");
                    return Some(MatchPhase::Over);
                }
                None
            }
            MatchPhase::Paused | MatchPhase::Over => None,
        }
    }

    pub fn pause(&mut self) -> bool {
        match self.phase {
            MatchPhase::Running | MatchPhase::Countdown => {
                self.paused_from = Some(self.phase);
                self.phase = MatchPhase::Paused;
                true
            }
            _ => false,
        }
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != MatchPhase::Paused {
            return false;
        }
        self.phase = self.paused_from.take().unwrap_or(MatchPhase::Running);
        true
    }

    /// Credit a goal and restart from a countdown
    pub fn record_goal(&mut self, scoring_team: Team) -> Score {
        self.score.credit(scoring_team);
        info!(
            team = %scoring_team,
            blue = self.score.blue,
            orange = self.score.orange,
            "goal"
        );
        if self.phase == MatchPhase::Running {
            self.start_countdown();
        }
        self.score
    }

    /// Winner once the match is over; `None` while playing or on a draw
    pub fn winner(&self) -> Option<Team> {
        if self.is_over() {
            self.score.leader()
        } else {
            None
        }
    }

    pub fn restart(&mut self) {
        *self = Self::new(self.cfg.clone());
    }
}
