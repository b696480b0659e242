//! Round lifecycle: advance, record/clear results, cancel and revert rounds.
//!
//! States: not started (round 0) -> round `n` open -> round `n` complete ->
//! round `n + 1` open. The [`Tournament`] is owned by the caller and passed
//! to every operation. Each mutating operation works on a draft copy and
//! only commits it on success, so a failed call leaves the aggregate
//! exactly as it was.

use chrono::Utc;
use serde_json::json;
use swiss_core::{
    Competitor, CompetitorId, EventKind, NotFoundError, ResultCode, RerecordPolicy, Round,
    StateError, Tournament, TournamentConfig, TournamentResult, TournamentStatus, UnresolvedTable,
    ValidationError, BYE_ID,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::pairing::PairingEngine;
use crate::{audit, recompute, standings};

/// Minimum roster size for a tournament
pub const MIN_COMPETITORS: usize = 2;

/// Create a new tournament. Title and description must not be blank.
pub fn initialize_tournament(
    title: &str,
    description: &str,
    competitors: Vec<Competitor>,
    config: TournamentConfig,
) -> TournamentResult<Tournament> {
    if title.trim().is_empty() {
        return Err(ValidationError::BlankField("title").into());
    }
    if description.trim().is_empty() {
        return Err(ValidationError::BlankField("description").into());
    }
    config.validate()?;
    if competitors.len() < MIN_COMPETITORS {
        return Err(ValidationError::TooFewCompetitors {
            min: MIN_COMPETITORS,
            found: competitors.len(),
        }
        .into());
    }

    let mut roster: Vec<Competitor> = Vec::with_capacity(competitors.len());
    for mut competitor in competitors {
        validate_competitor(&competitor, &roster)?;
        competitor.reset_aggregates();
        roster.push(competitor);
    }

    let mut tournament = Tournament {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: description.to_string(),
        status: TournamentStatus::Active,
        current_round: 0,
        total_competitors: roster.len(),
        start_time: Utc::now(),
        end_time: None,
        config,
        rounds: Vec::new(),
        competitors: roster,
        events: Vec::new(),
    };
    audit::append(
        &mut tournament.events,
        EventKind::TournamentInitialized,
        0,
        None,
        json!({ "title": tournament.title, "competitors": tournament.total_competitors }),
    );
    info!(title, competitors = tournament.total_competitors, "tournament initialized");
    Ok(tournament)
}

/// Add a competitor before round 1 opens. Returns the generated id.
pub fn add_competitor(
    tournament: &mut Tournament,
    name: &str,
    club: Option<String>,
) -> TournamentResult<CompetitorId> {
    transact(tournament, |t| {
        if t.is_started() {
            return Err(StateError::RosterLocked {
                current: t.current_round,
            }
            .into());
        }
        let mut competitor = Competitor::with_generated_id(name.trim());
        competitor.club = club.filter(|c| !c.trim().is_empty());
        validate_competitor(&competitor, &t.competitors)?;

        let id = competitor.id.clone();
        t.competitors.push(competitor);
        t.total_competitors = t.competitors.len();
        audit::append(
            &mut t.events,
            EventKind::CompetitorAdded,
            0,
            None,
            json!({ "id": id, "name": name.trim() }),
        );
        Ok(id)
    })
}

/// Ranked competitors with scores and Buchholz rebuilt from round history.
pub fn get_standings(tournament: &Tournament) -> Vec<Competitor> {
    let mut competitors = tournament.competitors.clone();
    recompute::recompute_competitors(
        &mut competitors,
        &tournament.rounds,
        tournament.current_round,
    );
    standings::standings(&competitors)
}

/// The open round, or None before the tournament starts.
pub fn get_current_round(tournament: &Tournament) -> Option<&Round> {
    tournament.current()
}

/// Drives round transitions using a pairing engine.
pub struct RoundManager {
    engine: PairingEngine,
}

impl Default for RoundManager {
    fn default() -> Self {
        Self::new(PairingEngine::default())
    }
}

impl RoundManager {
    pub fn new(engine: PairingEngine) -> Self {
        Self { engine }
    }

    /// Pair and open the next round. Returns its number.
    ///
    /// Refuses while the current round has unresolved tables. Rounds kept
    /// after a revert are discarded before the new round is appended.
    pub fn advance_to_next_round(&mut self, tournament: &mut Tournament) -> TournamentResult<u32> {
        let engine = &mut self.engine;
        transact(tournament, |t| {
            if let Some(total) = t.config.rounds_total {
                if t.current_round >= total {
                    return Err(StateError::AllRoundsPlayed { total }.into());
                }
            }
            if t.is_started() {
                let current = t.current().ok_or(NotFoundError::Round {
                    round: t.current_round,
                })?;
                if !current.is_complete {
                    return Err(incomplete_round(t, current).into());
                }
            }

            let next = t.current_round + 1;
            refresh_aggregates(t);
            let matches = engine.generate(t, &t.competitors, next)?;

            let discarded: Vec<u32> = t
                .rounds
                .iter()
                .filter(|r| r.number >= next)
                .map(|r| r.number)
                .collect();
            let retracted: usize = discarded
                .iter()
                .map(|&n| audit::retract_results(&mut t.events, n, None))
                .sum();
            t.rounds.retain(|r| r.number < next);
            let byes = matches.iter().filter(|m| m.is_bye()).count();
            let tables = matches.len();
            t.rounds.push(Round::new(next, matches));
            t.current_round = next;
            t.total_competitors = t.competitors.len();

            audit::append(
                &mut t.events,
                EventKind::RoundStarted,
                next,
                None,
                json!({
                    "tables": tables,
                    "byes": byes,
                    "discarded_rounds": discarded,
                    "retracted_results": retracted,
                }),
            );
            info!(round = next, tables, byes, "round opened");
            Ok(next)
        })
    }

    /// Record a result and rebuild aggregates and standings.
    pub fn record_match_result(
        &self,
        tournament: &mut Tournament,
        round: u32,
        table: u32,
        code: ResultCode,
    ) -> TournamentResult<()> {
        transact(tournament, |t| {
            let bye_value = t.config.bye_value;
            let policy = t.config.rerecord_policy;
            let target = t.round_mut(round).ok_or(NotFoundError::Round { round })?;
            let m = target
                .match_at_mut(table)
                .ok_or(NotFoundError::Table { round, table })?;

            match (code, m.is_bye()) {
                (ResultCode::ByeA, false) => {
                    return Err(ValidationError::ByeResultOnNonByeMatch { round, table }.into())
                }
                (ResultCode::AWin | ResultCode::BWin | ResultCode::Draw, true) => {
                    return Err(ValidationError::NonByeResultOnByeMatch { round, table }.into())
                }
                _ => {}
            }
            if m.has_result() && policy == RerecordPolicy::Reject {
                return Err(StateError::ResultAlreadyRecorded { round, table }.into());
            }

            let (score_a, score_b) = code.scores(bye_value);
            m.result = Some(code);
            m.score_a = score_a;
            m.score_b = score_b;
            let snapshot = m.clone();
            target.refresh_completion();

            refresh_aggregates(t);
            refresh_status(t);
            audit::record_result(&mut t.events, &snapshot);
            debug!(round, table, result = %code, "result recorded");
            Ok(())
        })
    }

    /// Clear one table's result.
    pub fn clear_match_result(
        &self,
        tournament: &mut Tournament,
        round: u32,
        table: u32,
    ) -> TournamentResult<()> {
        transact(tournament, |t| {
            let target = t.round_mut(round).ok_or(NotFoundError::Round { round })?;
            let m = target
                .match_at_mut(table)
                .ok_or(NotFoundError::Table { round, table })?;
            let previous = m.result;
            m.clear_result();
            target.refresh_completion();

            refresh_aggregates(t);
            refresh_status(t);
            let retracted = audit::retract_results(&mut t.events, round, Some(table));
            audit::append(
                &mut t.events,
                EventKind::MatchResultCleared,
                round,
                Some(table),
                json!({ "previous_result": previous, "retracted_results": retracted }),
            );
            debug!(round, table, "result cleared");
            Ok(())
        })
    }

    /// Clear every result in a round.
    pub fn clear_all_results_in_round(
        &self,
        tournament: &mut Tournament,
        round: u32,
    ) -> TournamentResult<()> {
        transact(tournament, |t| {
            let target = t.round_mut(round).ok_or(NotFoundError::Round { round })?;
            let cleared = target.recorded_results();
            for m in target.matches.iter_mut() {
                m.clear_result();
            }
            target.refresh_completion();

            refresh_aggregates(t);
            refresh_status(t);
            let retracted = audit::retract_results(&mut t.events, round, None);
            audit::append(
                &mut t.events,
                EventKind::RoundResultsCleared,
                round,
                None,
                json!({ "cleared": cleared, "retracted_results": retracted }),
            );
            debug!(round, cleared, "round results cleared");
            Ok(())
        })
    }

    /// Remove the current round. Only allowed before any result is recorded.
    pub fn cancel_current_round(&self, tournament: &mut Tournament) -> TournamentResult<()> {
        transact(tournament, |t| {
            if !t.is_started() {
                return Err(StateError::NoRoundToCancel.into());
            }
            let cancelled = t.current_round;
            let current = t.current().ok_or(NotFoundError::Round { round: cancelled })?;
            let recorded = current.recorded_results();
            if recorded > 0 {
                return Err(StateError::RoundHasResults {
                    round: cancelled,
                    recorded,
                }
                .into());
            }

            let retracted: usize = t
                .rounds
                .iter()
                .filter(|r| r.number > cancelled)
                .map(|r| audit::retract_results(&mut t.events, r.number, None))
                .sum();
            t.rounds.retain(|r| r.number < cancelled);
            t.current_round -= 1;
            refresh_aggregates(t);
            refresh_status(t);
            audit::append(
                &mut t.events,
                EventKind::RoundCancelled,
                cancelled,
                None,
                json!({
                    "cancelled_round": cancelled,
                    "reason": "round cancelled and reverted",
                    "retracted_results": retracted,
                }),
            );
            info!(round = cancelled, "round cancelled");
            Ok(())
        })
    }

    /// Step back to the previous round, keeping later round data.
    ///
    /// Aggregates are rebuilt from rounds up to the new current round only.
    pub fn go_back_to_previous_round(&self, tournament: &mut Tournament) -> TournamentResult<()> {
        transact(tournament, |t| {
            if t.current_round <= 1 {
                return Err(StateError::CannotRevert {
                    current: t.current_round,
                }
                .into());
            }
            let previous = t.current_round - 1;
            if t.round(previous).is_none() {
                return Err(NotFoundError::Round { round: previous }.into());
            }

            t.current_round = previous;
            refresh_aggregates(t);
            refresh_status(t);
            audit::append(
                &mut t.events,
                EventKind::RoundReverted,
                previous,
                None,
                json!({ "previous_round": previous + 1, "new_round": previous }),
            );
            info!(from = previous + 1, to = previous, "went back to previous round");
            Ok(())
        })
    }
}

/// Run `op` on a draft copy and commit it only if `op` succeeds.
fn transact<T>(
    tournament: &mut Tournament,
    op: impl FnOnce(&mut Tournament) -> TournamentResult<T>,
) -> TournamentResult<T> {
    let mut draft = tournament.clone();
    let out = op(&mut draft)?;
    *tournament = draft;
    Ok(out)
}

fn refresh_aggregates(t: &mut Tournament) {
    recompute::recompute_competitors(&mut t.competitors, &t.rounds, t.current_round);
    standings::refresh_buchholz(&mut t.competitors);
}

/// COMPLETE once the final configured round is the current one and complete.
fn refresh_status(t: &mut Tournament) {
    let finished = t.config.rounds_total.is_some_and(|total| {
        t.current_round == total && t.current().is_some_and(|r| r.is_complete)
    });
    if finished {
        t.status = TournamentStatus::Complete;
        t.end_time.get_or_insert_with(Utc::now);
    } else {
        t.status = TournamentStatus::Active;
        t.end_time = None;
    }
}

fn validate_competitor(candidate: &Competitor, roster: &[Competitor]) -> TournamentResult<()> {
    if candidate.name.trim().is_empty() {
        return Err(ValidationError::BlankField("competitor name").into());
    }
    if candidate.id.trim().is_empty() {
        return Err(ValidationError::BlankField("competitor id").into());
    }
    if candidate.id == BYE_ID {
        return Err(ValidationError::ReservedCompetitorId(candidate.id.clone()).into());
    }
    if roster.iter().any(|c| c.id == candidate.id) {
        return Err(ValidationError::DuplicateCompetitorId(candidate.id.clone()).into());
    }
    Ok(())
}

fn incomplete_round(t: &Tournament, round: &Round) -> StateError {
    let unresolved: Vec<UnresolvedTable> = round
        .matches
        .iter()
        .filter(|m| !m.has_result())
        .map(|m| UnresolvedTable {
            table: m.table,
            label: if m.is_bye() {
                format!("{} (BYE)", t.display_name(&m.competitor_a))
            } else {
                format!(
                    "{} vs {}",
                    t.display_name(&m.competitor_a),
                    t.display_name(&m.competitor_b)
                )
            },
        })
        .collect();

    StateError::RoundIncomplete {
        round: round.number,
        completed: round.matches.len() - unresolved.len(),
        total: round.matches.len(),
        unresolved,
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
