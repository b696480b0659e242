//! Buchholz tie-breaks and the standings order

use std::cmp::Ordering;
use std::collections::HashMap;

use swiss_core::{Competitor, CompetitorId, BYE_ID};

/// Sum of the current scores of every distinct opponent, ignoring byes.
pub fn buchholz(competitor: &Competitor, scores: &HashMap<&str, f64>) -> f64 {
    let mut seen: Vec<&str> = Vec::with_capacity(competitor.opponent_ids.len());
    let mut sum = 0.0;
    for id in &competitor.opponent_ids {
        if id == BYE_ID || seen.contains(&id.as_str()) {
            continue;
        }
        seen.push(id);
        sum += scores.get(id.as_str()).copied().unwrap_or(0.0);
    }
    sum
}

/// Refresh every competitor's Buchholz from the latest scores.
pub fn refresh_buchholz(competitors: &mut [Competitor]) {
    let values: Vec<f64> = {
        let scores: HashMap<&str, f64> = competitors
            .iter()
            .map(|c| (c.id.as_str(), c.score))
            .collect();
        competitors.iter().map(|c| buchholz(c, &scores)).collect()
    };
    for (competitor, value) in competitors.iter_mut().zip(values) {
        competitor.buchholz = value;
    }
}

/// Standings order: score desc, Buchholz desc, name asc.
///
/// The id breaks exact name clashes so the order is total.
pub fn compare(a: &Competitor, b: &Competitor) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.buchholz.total_cmp(&a.buchholz))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Ranked copy of the competitors with freshly computed Buchholz.
pub fn standings(competitors: &[Competitor]) -> Vec<Competitor> {
    let mut ranked = competitors.to_vec();
    refresh_buchholz(&mut ranked);
    ranked.sort_by(compare);
    ranked
}

/// Position of each competitor in a ranked list (0 = leader).
pub fn rank_index(ranked: &[Competitor]) -> HashMap<CompetitorId, usize> {
    ranked
        .iter()
        .enumerate()
        .map(|(rank, c)| (c.id.clone(), rank))
        .collect()
}

#[cfg(test)]
#[path = "standings_tests.rs"]
mod tests;
