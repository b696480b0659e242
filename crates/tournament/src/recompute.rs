//! Rebuilds competitor aggregates from round history.
//!
//! Aggregates are never patched in place: every result change, clear or
//! round reversion triggers a full rebuild, so editing a result can never
//! count it twice.

use std::collections::HashMap;

use swiss_core::{Competitor, Round};
use tracing::debug;

/// Reset and rebuild score, opponents, color history and bye flag for every
/// competitor, using only matches with a result in rounds `<= current_round`.
///
/// Buchholz is left at zero; it depends on final scores and is filled in by
/// [`crate::standings::refresh_buchholz`].
pub fn recompute_competitors(competitors: &mut [Competitor], rounds: &[Round], current_round: u32) {
    let index: HashMap<String, usize> = competitors
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id.clone(), i))
        .collect();

    for competitor in competitors.iter_mut() {
        competitor.reset_aggregates();
    }

    let mut applied = 0usize;
    for round in rounds.iter().filter(|r| r.number <= current_round) {
        for m in round.matches.iter().filter(|m| m.has_result()) {
            applied += 1;

            if let Some(&a) = index.get(&m.competitor_a) {
                competitors[a].score += m.score_a;
                if m.is_bye() {
                    competitors[a].has_bye = true;
                }
            }
            if m.is_bye() {
                continue;
            }
            if let Some(&b) = index.get(&m.competitor_b) {
                competitors[b].score += m.score_b;
            }

            for (me, opponent) in [
                (&m.competitor_a, &m.competitor_b),
                (&m.competitor_b, &m.competitor_a),
            ] {
                let Some(&i) = index.get(me) else { continue };
                let competitor = &mut competitors[i];
                if !competitor.has_played(opponent) {
                    competitor.opponent_ids.push(opponent.clone());
                }
                if let Some(color) = m.color_of(me) {
                    competitor.color_history.push(color.as_char());
                }
            }
        }
    }

    debug!(
        competitors = competitors.len(),
        current_round,
        applied,
        "recomputed competitor aggregates"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use swiss_core::{Color, Match, ResultCode, BYE_ID};

    fn decided(mut m: Match, code: ResultCode) -> Match {
        let (a, b) = code.scores(1.0);
        m.result = Some(code);
        m.score_a = a;
        m.score_b = b;
        m
    }

    fn roster() -> Vec<Competitor> {
        vec![
            Competitor::new("a", "Alice"),
            Competitor::new("b", "Bob"),
            Competitor::new("c", "Carol"),
        ]
    }

    #[test]
    fn applies_scores_colors_and_opponents() {
        let mut competitors = roster();
        let rounds = vec![Round::new(
            1,
            vec![
                decided(Match::pairing(1, 1, "a", "b", Color::White), ResultCode::AWin),
                decided(Match::bye(1, 2, "c"), ResultCode::ByeA),
            ],
        )];

        recompute_competitors(&mut competitors, &rounds, 1);

        let [alice, bob, carol] = &competitors[..] else {
            panic!("three competitors expected");
        };
        assert_eq!(alice.score, 1.0);
        assert_eq!(alice.color_history, "W");
        assert_eq!(alice.opponent_ids, vec!["b".to_string()]);
        assert_eq!(bob.score, 0.0);
        assert_eq!(bob.color_history, "B");
        assert_eq!(carol.score, 1.0);
        assert!(carol.has_bye);
        assert!(carol.opponent_ids.is_empty());
        assert!(competitors
            .iter()
            .all(|c| !c.opponent_ids.iter().any(|id| id == BYE_ID)));
    }

    #[test]
    fn skips_unrecorded_matches_and_later_rounds() {
        let mut competitors = roster();
        let rounds = vec![
            Round::new(1, vec![Match::pairing(1, 1, "a", "b", Color::White)]),
            Round::new(
                2,
                vec![decided(
                    Match::pairing(2, 1, "a", "c", Color::Black),
                    ResultCode::Draw,
                )],
            ),
        ];

        recompute_competitors(&mut competitors, &rounds, 1);
        assert!(competitors.iter().all(|c| c.score == 0.0));
        assert!(competitors.iter().all(|c| c.opponent_ids.is_empty()));

        recompute_competitors(&mut competitors, &rounds, 2);
        assert_eq!(competitors[0].score, 0.5);
        assert_eq!(competitors[0].color_history, "B");
        assert_eq!(competitors[2].color_history, "W");
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut competitors = roster();
        let rounds = vec![Round::new(
            1,
            vec![decided(
                Match::pairing(1, 1, "b", "c", Color::White),
                ResultCode::BWin,
            )],
        )];

        recompute_competitors(&mut competitors, &rounds, 1);
        let first = competitors.clone();
        recompute_competitors(&mut competitors, &rounds, 1);

        assert_eq!(first, competitors);
    }
}
