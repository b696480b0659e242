use super::*;
use pretty_assertions::assert_eq;

#[test]
fn result_codes_parse_wire_names() {
    assert_eq!("A_WIN".parse::<ResultCode>(), Ok(ResultCode::AWin));
    assert_eq!("b_win".parse::<ResultCode>(), Ok(ResultCode::BWin));
    assert_eq!(" DRAW ".parse::<ResultCode>(), Ok(ResultCode::Draw));
    assert_eq!("bye-a".parse::<ResultCode>(), Ok(ResultCode::ByeA));
}

#[test]
fn unknown_result_code_is_a_validation_error() {
    assert_eq!(
        "WHITE_WINS".parse::<ResultCode>(),
        Err(ValidationError::UnknownResultCode("WHITE_WINS".to_string()))
    );
}

#[test]
fn decided_results_sum_to_one() {
    for code in [ResultCode::AWin, ResultCode::BWin, ResultCode::Draw] {
        let (a, b) = code.scores(1.0);
        assert_eq!(a + b, 1.0, "{code}");
    }
    assert_eq!(ResultCode::ByeA.scores(0.5), (0.5, 0.0));
}

#[test]
fn result_code_serializes_as_screaming_snake_case() {
    let json = serde_json::to_string(&ResultCode::ByeA).unwrap();
    assert_eq!(json, "\"BYE_A\"");
}

#[test]
fn pairing_match_places_colors() {
    let m = Match::pairing(2, 1, "a", "b", Color::Black);
    assert_eq!(m.white, "b");
    assert_eq!(m.black.as_deref(), Some("a"));
    assert_eq!(m.color_of("a"), Some(Color::Black));
    assert_eq!(m.color_of("b"), Some(Color::White));
    assert!(!m.is_bye());
}

#[test]
fn bye_match_has_no_colors_or_opponent() {
    let m = Match::bye(1, 3, "c");
    assert!(m.is_bye());
    assert!(m.involves("c"));
    assert!(!m.involves(BYE_ID));
    assert_eq!(m.color_of("c"), None);
}

#[test]
fn winner_follows_result() {
    let mut m = Match::pairing(1, 1, "a", "b", Color::White);
    assert_eq!(m.winner(), None);
    m.result = Some(ResultCode::BWin);
    assert_eq!(m.winner(), Some("b"));
    m.result = Some(ResultCode::Draw);
    assert_eq!(m.winner(), None);
}

#[test]
fn round_completion_tracks_results() {
    let mut round = Round::new(
        1,
        vec![
            Match::pairing(1, 1, "a", "b", Color::White),
            Match::bye(1, 2, "c"),
        ],
    );
    assert!(!round.is_complete);

    round.match_at_mut(1).unwrap().result = Some(ResultCode::Draw);
    round.refresh_completion();
    assert!(!round.is_complete);
    assert_eq!(round.recorded_results(), 1);

    round.match_at_mut(2).unwrap().result = Some(ResultCode::ByeA);
    round.refresh_completion();
    assert!(round.is_complete);
}

#[test]
fn competitor_last_color_reads_history() {
    let mut c = Competitor::new("a", "Alice");
    assert_eq!(c.last_color(), None);
    c.color_history = "WB".to_string();
    assert_eq!(c.last_color(), Some(Color::Black));
    c.reset_aggregates();
    assert!(c.color_history.is_empty());
}

#[test]
fn generated_ids_are_unique() {
    let a = Competitor::with_generated_id("Alice");
    let b = Competitor::with_generated_id("Alice");
    assert_ne!(a.id, b.id);
    assert_ne!(a.id, BYE_ID);
}
