use super::*;
use pretty_assertions::assert_eq;

fn competitor(id: &str, name: &str, score: f64, opponents: &[&str]) -> Competitor {
    let mut c = Competitor::new(id, name);
    c.score = score;
    c.opponent_ids = opponents.iter().map(|s| s.to_string()).collect();
    c
}

#[test]
fn buchholz_sums_current_opponent_scores() {
    let mut competitors = vec![
        competitor("a", "Alice", 2.0, &["b", "c"]),
        competitor("b", "Bob", 1.0, &["a"]),
        competitor("c", "Carol", 0.5, &["a"]),
    ];

    refresh_buchholz(&mut competitors);

    assert_eq!(competitors[0].buchholz, 1.5);
    assert_eq!(competitors[1].buchholz, 2.0);
    assert_eq!(competitors[2].buchholz, 2.0);
}

#[test]
fn buchholz_ignores_bye_and_duplicates() {
    let c = competitor("a", "Alice", 1.0, &["b", BYE_ID, "b"]);
    let scores = HashMap::from([("a", 1.0), ("b", 1.5), (BYE_ID, 99.0)]);
    assert_eq!(buchholz(&c, &scores), 1.5);
}

#[test]
fn standings_break_ties_by_buchholz_then_name() {
    let competitors = vec![
        competitor("d", "Dave", 1.0, &["c"]),
        competitor("c", "Carol", 0.0, &["d"]),
        competitor("b", "Bob", 1.0, &["a"]),
        competitor("a", "Alice", 0.5, &["b"]),
        competitor("e", "Eve", 1.0, &["c"]),
    ];

    let ranked = standings(&competitors);
    let names: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();

    // Bob's opponent has 0.5; Dave and Eve both faced Carol (0.0).
    assert_eq!(names, vec!["Bob", "Dave", "Eve", "Alice", "Carol"]);
    assert_eq!(rank_index(&ranked)["e"], 2);
}

#[test]
fn same_name_falls_back_to_id() {
    let a = competitor("x2", "Sam", 0.0, &[]);
    let b = competitor("x1", "Sam", 0.0, &[]);
    assert_eq!(compare(&a, &b), Ordering::Greater);
}
