//! Error taxonomy for tournament operations.
//!
//! Every lifecycle operation returns [`TournamentError`]:
//! - `Validation`: malformed input (blank fields, unknown result codes, bad bye usage)
//! - `State`: the operation is not allowed in the current round state
//! - `NotFound`: the referenced round or table does not exist
//! - `ConstraintUnsatisfiable`: pairing search exhausted without a full pairing

use thiserror::Error;

use std::fmt;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TournamentError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    #[error(
        "unable to generate pairings for round {round}: no-rematch and \
         max score difference {max_score_gap} constraints cannot be satisfied"
    )]
    ConstraintUnsatisfiable { round: u32, max_score_gap: f64 },
}

impl TournamentError {
    pub fn is_state(&self) -> bool {
        matches!(self, TournamentError::State(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, TournamentError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TournamentError::NotFound(_))
    }

    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, TournamentError::ConstraintUnsatisfiable { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("field must be filled: {0} is required")]
    BlankField(&'static str),

    #[error("unknown result code {0:?} (expected A_WIN, B_WIN, DRAW or BYE_A)")]
    UnknownResultCode(String),

    #[error("invalid result BYE_A for non-bye match at round {round}, table {table}")]
    ByeResultOnNonByeMatch { round: u32, table: u32 },

    #[error("bye match at round {round}, table {table} only accepts BYE_A")]
    NonByeResultOnByeMatch { round: u32, table: u32 },

    #[error("competitor id {0:?} is reserved for byes")]
    ReservedCompetitorId(String),

    #[error("duplicate competitor id {0:?}")]
    DuplicateCompetitorId(String),

    #[error("at least {min} competitors are required, got {found}")]
    TooFewCompetitors { min: usize, found: usize },

    #[error("bye value {0} must be between 0 and 1")]
    InvalidByeValue(f64),

    #[error("max score gap {0} must be a non-negative number")]
    InvalidScoreGap(f64),

    #[error("rounds total must be at least 1")]
    InvalidRoundsTotal,

    #[error("first-round pairer {pairer:?} did not place every competitor exactly once")]
    InvalidFirstRoundPairing { pairer: String },
}

/// A table still waiting for a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedTable {
    pub table: u32,
    /// "Alice vs Bob" or "Carol (BYE)"
    pub label: String,
}

impl fmt::Display for UnresolvedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Table {}: {}", self.table, self.label)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    #[error(
        "cannot advance: round {round} is not complete ({completed}/{total} matches finished); \
         incomplete: {}",
        join_tables(.unresolved)
    )]
    RoundIncomplete {
        round: u32,
        completed: usize,
        total: usize,
        unresolved: Vec<UnresolvedTable>,
    },

    #[error(
        "cannot cancel round {round}: {recorded} match(es) have recorded results, clear them first"
    )]
    RoundHasResults { round: u32, recorded: usize },

    #[error("cannot cancel: no rounds to cancel")]
    NoRoundToCancel,

    #[error("cannot go back: already at round 1 or no rounds exist (current round: {current})")]
    CannotRevert { current: u32 },

    #[error("no active tournament")]
    NoActiveTournament,

    #[error("result already recorded for round {round}, table {table}")]
    ResultAlreadyRecorded { round: u32, table: u32 },

    #[error("cannot add competitors after the tournament has started (current round: {current})")]
    RosterLocked { current: u32 },

    #[error("all {total} rounds have been played")]
    AllRoundsPlayed { total: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    #[error("round {round} not found")]
    Round { round: u32 },

    #[error("match not found for round {round}, table {table}")]
    Table { round: u32, table: u32 },
}

fn join_tables(tables: &[UnresolvedTable]) -> String {
    tables
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias used throughout the tournament crates.
pub type TournamentResult<T> = Result<T, TournamentError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
