use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::config::TournamentConfig;
use crate::error::ValidationError;

/// Competitor identifier (a UUID string or a player handle).
pub type CompetitorId = String;

/// Reserved opponent id marking a bye. Never a real competitor.
pub const BYE_ID: &str = "BYE";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Character used in a competitor's color history string.
    pub fn as_char(self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'W' => Some(Color::White),
            'B' => Some(Color::Black),
            _ => None,
        }
    }
}

/// Outcome of a single match, from competitor A's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultCode {
    AWin,
    BWin,
    Draw,
    ByeA,
}

impl ResultCode {
    pub const ALL: [ResultCode; 4] = [
        ResultCode::AWin,
        ResultCode::BWin,
        ResultCode::Draw,
        ResultCode::ByeA,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResultCode::AWin => "A_WIN",
            ResultCode::BWin => "B_WIN",
            ResultCode::Draw => "DRAW",
            ResultCode::ByeA => "BYE_A",
        }
    }

    /// Points awarded as (score A, score B).
    pub fn scores(self, bye_value: f64) -> (f64, f64) {
        match self {
            ResultCode::AWin => (1.0, 0.0),
            ResultCode::BWin => (0.0, 1.0),
            ResultCode::Draw => (0.5, 0.5),
            ResultCode::ByeA => (bye_value, 0.0),
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        ResultCode::ALL
            .into_iter()
            .find(|code| code.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownResultCode(s.to_string()))
    }
}

/// A single participant together with aggregates derived from round history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club: Option<String>,
    /// Current total points
    pub score: f64,
    /// Distinct opponents faced, in order of first meeting
    pub opponent_ids: Vec<CompetitorId>,
    /// Buchholz: sum of opponents' current scores
    pub buchholz: f64,
    /// E.g. "WBW"
    pub color_history: String,
    pub has_bye: bool,
}

impl Competitor {
    pub fn new(id: impl Into<CompetitorId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            club: None,
            score: 0.0,
            opponent_ids: Vec::new(),
            buchholz: 0.0,
            color_history: String::new(),
            has_bye: false,
        }
    }

    /// Create a competitor with a freshly generated UUID id.
    pub fn with_generated_id(name: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4().to_string(), name)
    }

    pub fn last_color(&self) -> Option<Color> {
        self.color_history.chars().last().and_then(Color::from_char)
    }

    pub fn has_played(&self, other: &str) -> bool {
        self.opponent_ids.iter().any(|id| id == other)
    }

    /// Reset every derived aggregate; identity fields are kept.
    pub fn reset_aggregates(&mut self) {
        self.score = 0.0;
        self.opponent_ids.clear();
        self.buchholz = 0.0;
        self.color_history.clear();
        self.has_bye = false;
    }
}

/// One table of one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub round: u32,
    pub table: u32,
    pub competitor_a: CompetitorId,
    /// [`BYE_ID`] when competitor A receives a bye
    pub competitor_b: CompetitorId,
    pub white: CompetitorId,
    /// None for a bye
    pub black: Option<CompetitorId>,
    pub result: Option<ResultCode>,
    pub score_a: f64,
    pub score_b: f64,
}

impl Match {
    pub fn pairing(round: u32, table: u32, a: &str, b: &str, white: Color) -> Self {
        let (white_id, black_id) = match white {
            Color::White => (a, b),
            Color::Black => (b, a),
        };
        Self {
            round,
            table,
            competitor_a: a.to_string(),
            competitor_b: b.to_string(),
            white: white_id.to_string(),
            black: Some(black_id.to_string()),
            result: None,
            score_a: 0.0,
            score_b: 0.0,
        }
    }

    pub fn bye(round: u32, table: u32, a: &str) -> Self {
        Self {
            round,
            table,
            competitor_a: a.to_string(),
            competitor_b: BYE_ID.to_string(),
            white: a.to_string(),
            black: None,
            result: None,
            score_a: 0.0,
            score_b: 0.0,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.competitor_b == BYE_ID
    }

    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    pub fn involves(&self, id: &str) -> bool {
        self.competitor_a == id || (!self.is_bye() && self.competitor_b == id)
    }

    /// Color played by `id` in this match, if it took part and the match was not a bye.
    pub fn color_of(&self, id: &str) -> Option<Color> {
        if self.white == id && !self.is_bye() {
            Some(Color::White)
        } else if self.black.as_deref() == Some(id) {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// Id of the winner, if the recorded result has one.
    pub fn winner(&self) -> Option<&str> {
        match self.result? {
            ResultCode::AWin | ResultCode::ByeA => Some(self.competitor_a.as_str()),
            ResultCode::BWin => Some(self.competitor_b.as_str()),
            ResultCode::Draw => None,
        }
    }

    pub fn clear_result(&mut self) {
        self.result = None;
        self.score_a = 0.0;
        self.score_b = 0.0;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub number: u32,
    pub matches: Vec<Match>,
    pub is_complete: bool,
}

impl Round {
    pub fn new(number: u32, matches: Vec<Match>) -> Self {
        let mut round = Self {
            number,
            matches,
            is_complete: false,
        };
        round.refresh_completion();
        round
    }

    /// Recompute the completion flag from the match results.
    pub fn refresh_completion(&mut self) {
        self.is_complete = self.matches.iter().all(Match::has_result);
    }

    pub fn recorded_results(&self) -> usize {
        self.matches.iter().filter(|m| m.has_result()).count()
    }

    pub fn match_at(&self, table: u32) -> Option<&Match> {
        self.matches.iter().find(|m| m.table == table)
    }

    pub fn match_at_mut(&mut self, table: u32) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.table == table)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    #[default]
    Active,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    TournamentInitialized,
    CompetitorAdded,
    RoundStarted,
    MatchResultRecorded,
    MatchResultCleared,
    RoundResultsCleared,
    RoundCancelled,
    RoundReverted,
}

/// Audit trail entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    pub round: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<u32>,
    #[serde(default)]
    pub details: serde_json::Value,
}

/// Whole tournament aggregate. Plain owned data; the caller owns it and
/// threads it through every lifecycle call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TournamentStatus,
    /// 0 means not started
    pub current_round: u32,
    pub total_competitors: usize,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub config: TournamentConfig,
    pub rounds: Vec<Round>,
    pub competitors: Vec<Competitor>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Tournament {
    pub fn round(&self, number: u32) -> Option<&Round> {
        self.rounds.iter().find(|r| r.number == number)
    }

    pub fn round_mut(&mut self, number: u32) -> Option<&mut Round> {
        self.rounds.iter_mut().find(|r| r.number == number)
    }

    pub fn current(&self) -> Option<&Round> {
        self.round(self.current_round)
    }

    pub fn competitor(&self, id: &str) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.id == id)
    }

    /// Display name for an id, falling back to the id itself.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        if id == BYE_ID {
            return BYE_ID;
        }
        self.competitor(id).map(|c| c.name.as_str()).unwrap_or(id)
    }

    pub fn is_started(&self) -> bool {
        self.current_round > 0
    }
}

/// A single pairing decision, before tables and colors are fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pairing {
    Pair(CompetitorId, CompetitorId),
    Bye(CompetitorId),
}

impl Pairing {
    pub fn ids(&self) -> impl Iterator<Item = &CompetitorId> {
        let (a, b) = match self {
            Pairing::Pair(a, b) => (a, Some(b)),
            Pairing::Bye(a) => (a, None),
        };
        std::iter::once(a).chain(b)
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
