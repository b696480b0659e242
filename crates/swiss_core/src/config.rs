//! Per-tournament pairing and scoring configuration

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default points for a bye
pub const DEFAULT_BYE_VALUE: f64 = 1.0;

/// Default maximum score difference between paired competitors
pub const DEFAULT_MAX_SCORE_GAP: f64 = 1.0;

/// What to do when no pairing exists without a rematch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RematchPolicy {
    /// Never pair two competitors twice; fail the round instead.
    #[default]
    Forbid,
    /// Run the strict search first, then retry with rematches allowed.
    LastResort,
}

/// What to do when a result is recorded for a table that already has one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerecordPolicy {
    #[default]
    Overwrite,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub bye_value: f64,
    pub max_score_gap: f64,
    /// Number of rounds to play (None = open-ended)
    pub rounds_total: Option<u32>,
    pub rematch_policy: RematchPolicy,
    pub rerecord_policy: RerecordPolicy,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            bye_value: DEFAULT_BYE_VALUE,
            max_score_gap: DEFAULT_MAX_SCORE_GAP,
            rounds_total: None,
            rematch_policy: RematchPolicy::default(),
            rerecord_policy: RerecordPolicy::default(),
        }
    }
}

impl TournamentConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.bye_value.is_finite() || !(0.0..=1.0).contains(&self.bye_value) {
            return Err(ValidationError::InvalidByeValue(self.bye_value));
        }
        if !self.max_score_gap.is_finite() || self.max_score_gap < 0.0 {
            return Err(ValidationError::InvalidScoreGap(self.max_score_gap));
        }
        if self.rounds_total == Some(0) {
            return Err(ValidationError::InvalidRoundsTotal);
        }
        Ok(())
    }
}
