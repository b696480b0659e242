//! Pairing engine: random first round, constrained search afterwards.
//!
//! From round 2 on, competitors are taken in seed order (the standings
//! order) and paired by a depth-first search under two hard constraints:
//! no rematches and a bounded score difference. The bye goes to someone
//! who has not had one. The search is exhaustive and deterministic; a
//! second bye (and, by policy, a rematch) is only considered once the
//! stricter search has failed for the whole round.

use std::collections::{HashMap, HashSet};

use random_pairer::RandomPairer;
use swiss_core::{
    Color, Competitor, CompetitorId, FirstRoundPairer, Match, Pairing, RematchPolicy, Tournament,
    TournamentError, TournamentResult, ValidationError,
};
use tracing::{debug, info, warn};

use crate::standings;

/// Floating point slack for score comparisons (bye values need not be halves).
const SCORE_EPSILON: f64 = 1e-9;

/// Produces the matches of a round.
pub struct PairingEngine {
    first_round: Box<dyn FirstRoundPairer>,
}

impl Default for PairingEngine {
    fn default() -> Self {
        Self::new(Box::new(RandomPairer::new()))
    }
}

impl PairingEngine {
    pub fn new(first_round: Box<dyn FirstRoundPairer>) -> Self {
        Self { first_round }
    }

    pub fn with_pairer(pairer: impl FirstRoundPairer + 'static) -> Self {
        Self::new(Box::new(pairer))
    }

    /// Generate the ordered, table-numbered matches of `round`.
    ///
    /// `tournament` supplies the configuration and the previous round (for
    /// table proximity and the table-1 anchor); `competitors` must carry
    /// up-to-date aggregates. Nothing is mutated.
    pub fn generate(
        &mut self,
        tournament: &Tournament,
        competitors: &[Competitor],
        round: u32,
    ) -> TournamentResult<Vec<Match>> {
        let ranked = standings::standings(competitors);

        let pairings = if round <= 1 {
            self.first_round_pairings(competitors)?
        } else {
            let previous = tournament.round(round - 1);
            let last_table: HashMap<&str, u32> = previous
                .map(|r| {
                    r.matches
                        .iter()
                        .flat_map(|m| {
                            let b = (!m.is_bye()).then_some(m.competitor_b.as_str());
                            std::iter::once(m.competitor_a.as_str())
                                .chain(b)
                                .map(move |id| (id, m.table))
                        })
                        .collect()
                })
                .unwrap_or_default();

            search_pairings(&ranked, &last_table, tournament, round)?
        };

        let by_id: HashMap<&str, &Competitor> =
            competitors.iter().map(|c| (c.id.as_str(), c)).collect();
        let mut matches: Vec<Match> = pairings
            .iter()
            .map(|p| match p {
                Pairing::Pair(a, b) => {
                    let white = match by_id.get(a.as_str()).and_then(|c| c.last_color()) {
                        Some(Color::White) => Color::Black,
                        _ => Color::White,
                    };
                    Match::pairing(round, 0, a, b, white)
                }
                Pairing::Bye(a) => Match::bye(round, 0, a),
            })
            .collect();

        let anchor = tournament
            .round(round.saturating_sub(1))
            .and_then(|r| r.match_at(1))
            .and_then(|m| m.winner());
        order_tables(&mut matches, anchor, &standings::rank_index(&ranked));

        info!(round, tables = matches.len(), "generated pairings");
        Ok(matches)
    }

    fn first_round_pairings(&mut self, competitors: &[Competitor]) -> TournamentResult<Vec<Pairing>> {
        let ids: Vec<CompetitorId> = competitors.iter().map(|c| c.id.clone()).collect();
        let pairings = self.first_round.pair(&ids);

        let mut placed: Vec<&CompetitorId> = pairings.iter().flat_map(Pairing::ids).collect();
        placed.sort();
        let mut expected: Vec<&CompetitorId> = ids.iter().collect();
        expected.sort();
        let byes = pairings
            .iter()
            .filter(|p| matches!(p, Pairing::Bye(_)))
            .count();

        if placed != expected || byes != ids.len() % 2 {
            return Err(ValidationError::InvalidFirstRoundPairing {
                pairer: self.first_round.name().to_string(),
            }
            .into());
        }
        debug!(pairer = self.first_round.name(), "first round paired");
        Ok(pairings)
    }
}

/// Run the constrained search over the seed order.
///
/// Passes, strictest first: no rematch and no second bye; then a second bye
/// allowed; then (under [`RematchPolicy::LastResort`]) rematches allowed.
fn search_pairings(
    seeds: &[Competitor],
    last_table: &HashMap<&str, u32>,
    tournament: &Tournament,
    round: u32,
) -> TournamentResult<Vec<Pairing>> {
    let config = &tournament.config;
    let mut search = Search {
        seeds,
        last_table,
        max_score_gap: config.max_score_gap,
        allow_rematch: false,
        allow_repeat_bye: false,
    };

    let mut solution = search.run();
    if solution.is_none() && seeds.len() % 2 == 1 {
        warn!(round, "no pairing gives the bye to a new competitor, allowing a second bye");
        search.allow_repeat_bye = true;
        solution = search.run();
    }
    if solution.is_none() && config.rematch_policy == RematchPolicy::LastResort {
        warn!(round, "no pairing without rematches, retrying with rematches allowed");
        search.allow_rematch = true;
        solution = search.run();
    }

    let Some(steps) = solution else {
        warn!(round, competitors = seeds.len(), "pairing search exhausted");
        return Err(TournamentError::ConstraintUnsatisfiable {
            round,
            max_score_gap: config.max_score_gap,
        });
    };

    Ok(steps
        .into_iter()
        .map(|step| match step {
            Step::Pair(a, b) => Pairing::Pair(seeds[a].id.clone(), seeds[b].id.clone()),
            Step::Bye(a) => Pairing::Bye(seeds[a].id.clone()),
        })
        .collect())
}

/// A confirmed decision, as indices into the seed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Pair(usize, usize),
    Bye(usize),
}

/// Depth-first pairing search.
///
/// Each call receives its own remaining pool (a seed-ordered index list) and
/// returns the steps that complete it, so no state needs undoing. Pools
/// already proven unpairable are remembered in `dead_ends`.
struct Search<'a> {
    seeds: &'a [Competitor],
    last_table: &'a HashMap<&'a str, u32>,
    max_score_gap: f64,
    allow_rematch: bool,
    allow_repeat_bye: bool,
}

impl Search<'_> {
    fn run(&self) -> Option<Vec<Step>> {
        let pool: Vec<usize> = (0..self.seeds.len()).collect();
        let mut dead_ends = HashSet::new();
        let mut steps = self.solve(&pool, false, &mut dead_ends)?;
        steps.reverse();
        Some(steps)
    }

    /// Steps completing `pool`, in reverse order of decision.
    fn solve(
        &self,
        pool: &[usize],
        bye_assigned: bool,
        dead_ends: &mut HashSet<(Vec<usize>, bool)>,
    ) -> Option<Vec<Step>> {
        let Some((&a, rest)) = pool.split_first() else {
            return Some(Vec::new());
        };
        if dead_ends.contains(&(pool.to_vec(), bye_assigned)) {
            return None;
        }

        for b in self.candidates(a, rest) {
            let remaining: Vec<usize> = rest.iter().copied().filter(|&i| i != b).collect();
            if let Some(mut steps) = self.solve(&remaining, bye_assigned, dead_ends) {
                steps.push(Step::Pair(a, b));
                return Some(steps);
            }
        }

        if pool.len() % 2 == 1 && !bye_assigned {
            if let Some(bye) = self.bye_candidate(pool) {
                let remaining: Vec<usize> = pool.iter().copied().filter(|&i| i != bye).collect();
                if let Some(mut steps) = self.solve(&remaining, true, dead_ends) {
                    steps.push(Step::Bye(bye));
                    return Some(steps);
                }
            }
        }

        dead_ends.insert((pool.to_vec(), bye_assigned));
        None
    }

    /// Legal opponents for `a`, best first: smallest score difference, then
    /// closest table in the previous round (unknown tables last).
    fn candidates(&self, a: usize, rest: &[usize]) -> Vec<usize> {
        let seed_a = &self.seeds[a];
        let table_a = self.last_table.get(seed_a.id.as_str());

        let mut candidates: Vec<(usize, f64, u32)> = rest
            .iter()
            .copied()
            .filter_map(|b| {
                let seed_b = &self.seeds[b];
                if !self.allow_rematch && (seed_a.has_played(&seed_b.id) || seed_b.has_played(&seed_a.id)) {
                    return None;
                }
                let diff = (seed_a.score - seed_b.score).abs();
                if diff > self.max_score_gap + SCORE_EPSILON {
                    return None;
                }
                let proximity = match (table_a, self.last_table.get(seed_b.id.as_str())) {
                    (Some(ta), Some(tb)) => ta.abs_diff(*tb),
                    _ => u32::MAX,
                };
                Some((b, diff, proximity))
            })
            .collect();

        candidates.sort_by(|x, y| x.1.total_cmp(&y.1).then(x.2.cmp(&y.2)));
        candidates.into_iter().map(|(b, _, _)| b).collect()
    }

    /// Lowest-ranked unpaired competitor without a previous bye (lowest
    /// score, then lowest Buchholz, then name). When everyone left has
    /// already had one, None, unless a repeat bye is allowed, in which case
    /// the lowest overall.
    fn bye_candidate(&self, pool: &[usize]) -> Option<usize> {
        let mut order = pool.to_vec();
        order.sort_by(|&x, &y| {
            let (cx, cy) = (&self.seeds[x], &self.seeds[y]);
            cx.score
                .total_cmp(&cy.score)
                .then_with(|| cx.buchholz.total_cmp(&cy.buchholz))
                .then_with(|| cx.name.cmp(&cy.name))
                .then_with(|| cx.id.cmp(&cy.id))
        });
        let fresh = order.iter().copied().find(|&i| !self.seeds[i].has_bye);
        if self.allow_repeat_bye {
            fresh.or_else(|| order.first().copied())
        } else {
            fresh
        }
    }
}

/// Final table order: the previous table-1 winner's match first, byes last,
/// everything else by the better-ranked competitor. Tables are renumbered 1..N.
fn order_tables(matches: &mut [Match], anchor: Option<&str>, rank: &HashMap<CompetitorId, usize>) {
    let best_rank = |m: &Match| -> usize {
        if m.is_bye() {
            return usize::MAX;
        }
        let ra = rank.get(&m.competitor_a).copied().unwrap_or(usize::MAX);
        let rb = rank.get(&m.competitor_b).copied().unwrap_or(usize::MAX);
        ra.min(rb)
    };

    matches.sort_by_key(|m| {
        let anchored = anchor.is_some_and(|id| m.involves(id));
        (!anchored, m.is_bye(), best_rank(m))
    });

    for (i, m) in matches.iter_mut().enumerate() {
        m.table = i as u32 + 1;
    }
}

#[cfg(test)]
#[path = "pairing_tests.rs"]
mod tests;
