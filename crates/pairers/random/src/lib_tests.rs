use super::*;
use std::collections::HashSet;

fn roster(n: usize) -> Vec<CompetitorId> {
    (1..=n).map(|i| format!("p{i}")).collect()
}

#[test]
fn even_roster_is_fully_paired() {
    let mut pairer = RandomPairer::seeded(7);
    let ids = roster(6);

    let pairings = pairer.pair(&ids);

    assert_eq!(pairings.len(), 3);
    assert!(pairings.iter().all(|p| matches!(p, Pairing::Pair(..))));
    let seen: HashSet<_> = pairings.iter().flat_map(Pairing::ids).collect();
    assert_eq!(seen.len(), 6);
}

#[test]
fn odd_roster_gets_exactly_one_bye() {
    let mut pairer = RandomPairer::seeded(11);
    let ids = roster(5);

    let pairings = pairer.pair(&ids);

    let byes = pairings
        .iter()
        .filter(|p| matches!(p, Pairing::Bye(_)))
        .count();
    assert_eq!(byes, 1);
    assert_eq!(pairings.iter().flat_map(Pairing::ids).count(), 5);
}

#[test]
fn same_seed_gives_same_pairing() {
    let ids = roster(8);
    let first = RandomPairer::seeded(42).pair(&ids);
    let second = RandomPairer::seeded(42).pair(&ids);
    assert_eq!(first, second);
}

#[test]
fn empty_roster_yields_nothing() {
    let mut pairer = RandomPairer::new();
    assert!(pairer.pair(&[]).is_empty());
}
