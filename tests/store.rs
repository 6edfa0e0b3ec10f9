//! Integration tests for the in-memory tournament store.

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use swiss_playoff_engine::{
    Competitor, KnownResult, ResultsByStage, Stage, StageKind, Tournament, TournamentError,
    TournamentStore, INACTIVITY_TIMEOUT,
};

fn swiss_only(n: u32) -> Tournament {
    let competitors = (1..=n).map(|s| Competitor::new(format!("T{s}"), s)).collect();
    let stage = Stage::new("stage-1", "Opening", StageKind::Swiss).with_competitors(competitors);
    Tournament::with_stages("Store test", vec![stage])
}

#[test]
fn insert_propagates_and_get_returns_a_copy() {
    let store = TournamentStore::new();
    let t = swiss_only(16);
    let id = t.id;
    let report = store.insert(t, ResultsByStage::new()).unwrap();
    assert_eq!(report.stages.len(), 1);

    let snapshot = store.get(id).unwrap();
    assert_eq!(snapshot.stages[0].rounds.len(), 5);
    assert_eq!(store.len(), 1);
}

#[test]
fn unknown_tournament_is_reported() {
    let store = TournamentStore::new();
    let missing = uuid::Uuid::new_v4();
    assert_eq!(store.get(missing), Err(TournamentError::TournamentNotFound(missing)));
}

#[test]
fn concurrent_submissions_are_all_applied() {
    let store = Arc::new(TournamentStore::new());
    let t = swiss_only(16);
    let id = t.id;
    store.insert(t, ResultsByStage::new()).unwrap();

    let round_1 = store.get(id).unwrap().stages[0].rounds[0].matches.clone();
    let handles: Vec<_> = round_1
        .into_iter()
        .map(|m| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let (a, b) = (m.team_1.id().unwrap(), m.team_2.id().unwrap());
                store
                    .submit_result(id, "stage-1", KnownResult::new(a, b, b).in_round(1))
                    .unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let t = store.get(id).unwrap();
    assert!(t.stages[0].rounds[0].matches.iter().all(|m| m.is_reported()));
    for m in &t.stages[0].rounds[0].matches {
        assert_eq!(m.winner, m.team_2.id());
    }
}

#[test]
fn inactive_tournaments_are_removed() {
    let store = TournamentStore::new();
    store.insert(swiss_only(4), ResultsByStage::new()).unwrap();
    store.insert(swiss_only(4), ResultsByStage::new()).unwrap();

    assert_eq!(store.remove_inactive(INACTIVITY_TIMEOUT).unwrap(), 0);
    assert_eq!(store.remove_inactive(Duration::ZERO).unwrap(), 2);
    assert!(store.is_empty());
}

#[test]
fn remove_drops_a_single_tournament() {
    let store = TournamentStore::new();
    let t = swiss_only(4);
    let id = t.id;
    store.insert(t, ResultsByStage::new()).unwrap();
    assert!(store.remove(id).unwrap());
    assert!(!store.remove(id).unwrap());
}
