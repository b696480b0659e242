//! Invariants that must hold for any roster size, shuffle and result mix.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use random_pairer::RandomPairer;
use swiss_core::{Competitor, ResultCode, Tournament, TournamentConfig, BYE_ID};
use tournament::recompute::recompute_competitors;
use tournament::standings::refresh_buchholz;
use tournament::{initialize_tournament, PairingEngine, RoundManager};

const ROUNDS: u32 = 2;

fn play(n: usize, seed: u64, codes: &[u8]) -> Tournament {
    let roster = (0..n)
        .map(|i| Competitor::new(format!("p{i:02}"), format!("Player {i:02}")))
        .collect();
    let mut t = initialize_tournament("Props", "Generated", roster, TournamentConfig::default())
        .expect("valid roster");
    let mut manager = RoundManager::new(PairingEngine::with_pairer(RandomPairer::seeded(seed)));

    let mut next_code = codes.iter().cycle();
    for _ in 0..ROUNDS {
        let round = manager.advance_to_next_round(&mut t).expect("pairable round");
        let tables: Vec<(u32, bool)> = t
            .round(round)
            .unwrap()
            .matches
            .iter()
            .map(|m| (m.table, m.is_bye()))
            .collect();
        for (table, bye) in tables {
            let code = if bye {
                ResultCode::ByeA
            } else {
                match next_code.next().copied().unwrap_or(0) {
                    0 => ResultCode::AWin,
                    1 => ResultCode::BWin,
                    _ => ResultCode::Draw,
                }
            };
            manager.record_match_result(&mut t, round, table, code).unwrap();
        }
    }
    t
}

fn scenario() -> impl Strategy<Value = (usize, u64, Vec<u8>)> {
    (4usize..12, any::<u64>(), prop::collection::vec(0u8..3, 1..12))
}

proptest! {
    #[test]
    fn every_competitor_plays_once_per_round((n, seed, codes) in scenario()) {
        let t = play(n, seed, &codes);
        for round in &t.rounds {
            let mut seen = HashSet::new();
            for m in &round.matches {
                prop_assert!(seen.insert(m.competitor_a.clone()));
                if !m.is_bye() {
                    prop_assert!(seen.insert(m.competitor_b.clone()));
                }
            }
            prop_assert_eq!(seen.len(), n);
            prop_assert!(round.matches.iter().filter(|m| m.is_bye()).count() <= 1);
        }
    }

    #[test]
    fn scores_add_up((n, seed, codes) in scenario()) {
        let t = play(n, seed, &codes);
        let mut expected = 0.0;
        for m in t.rounds.iter().flat_map(|r| &r.matches) {
            if m.is_bye() {
                prop_assert_eq!(m.score_a, t.config.bye_value);
                prop_assert_eq!(m.score_b, 0.0);
            } else {
                prop_assert_eq!(m.score_a + m.score_b, 1.0);
            }
            expected += m.score_a + m.score_b;
        }
        let total: f64 = t.competitors.iter().map(|c| c.score).sum();
        prop_assert!((total - expected).abs() < 1e-9);
    }

    #[test]
    fn opponent_lists_are_clean((n, seed, codes) in scenario()) {
        let t = play(n, seed, &codes);
        for c in &t.competitors {
            prop_assert!(!c.opponent_ids.iter().any(|id| id == BYE_ID));
            prop_assert!(!c.opponent_ids.contains(&c.id));
            let distinct: HashSet<_> = c.opponent_ids.iter().collect();
            prop_assert_eq!(distinct.len(), c.opponent_ids.len());
        }
    }

    #[test]
    fn buchholz_is_sum_of_opponent_scores((n, seed, codes) in scenario()) {
        let t = play(n, seed, &codes);
        let scores: HashMap<&str, f64> =
            t.competitors.iter().map(|c| (c.id.as_str(), c.score)).collect();
        for c in &t.competitors {
            let expected: f64 = c.opponent_ids.iter().map(|id| scores[id.as_str()]).sum();
            prop_assert!((c.buchholz - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn recompute_is_idempotent((n, seed, codes) in scenario()) {
        let t = play(n, seed, &codes);
        let mut rebuilt = t.competitors.clone();
        for _ in 0..2 {
            recompute_competitors(&mut rebuilt, &t.rounds, t.current_round);
            refresh_buchholz(&mut rebuilt);
        }
        prop_assert_eq!(rebuilt, t.competitors);
    }
}
