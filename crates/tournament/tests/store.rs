use pretty_assertions::assert_eq;
use random_pairer::RandomPairer;
use swiss_core::{Competitor, ResultCode, StateError, TournamentConfig, TournamentError};
use tempfile::TempDir;
use tournament::{
    initialize_tournament, JsonFileStore, PairingEngine, RoundManager, StoreError, TournamentStore,
};

#[test]
fn saved_tournament_loads_back_identically() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("tournament.json"));

    let roster = ["Ann", "Ben", "Cid"]
        .iter()
        .map(|n| Competitor::new(n.to_lowercase(), *n))
        .collect();
    let mut t =
        initialize_tournament("Stored", "Round trip", roster, TournamentConfig::default()).unwrap();
    let mut manager = RoundManager::new(PairingEngine::with_pairer(RandomPairer::seeded(11)));
    manager.advance_to_next_round(&mut t).unwrap();
    manager.record_match_result(&mut t, 1, 1, ResultCode::Draw).unwrap();

    store.save(&t).unwrap();
    assert!(store.exists());
    assert!(!dir.path().join("tournament.json.tmp").exists());

    let loaded = store.load().unwrap();
    assert_eq!(loaded, t);
}

#[test]
fn missing_file_means_no_active_tournament() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("absent.json"));

    let err = store.load().unwrap_err();
    assert!(matches!(
        err,
        StoreError::Tournament(TournamentError::State(StateError::NoActiveTournament))
    ));
}

#[test]
fn corrupt_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = JsonFileStore::new(&path).load().unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }));
    assert!(err.to_string().contains("broken.json"));
}
