//! Integration tests for record bookkeeping and Buchholz scoring.

use swiss_playoff_engine::logic::{buchholz_scores, competitors_as_of, records_before};
use swiss_playoff_engine::{
    compute_buchholz, compute_records, Competitor, CompetitorId, GameMatch, MatchFormat, Record,
    Round, Stage, StageKind, TournamentError, WinnerSource,
};

/// Four teams; round 1: 1 beats 3, 2 beats 4; round 2: 1 beats 2, 3 beats 4.
fn played_stage() -> (Stage, Vec<CompetitorId>) {
    let competitors: Vec<Competitor> = (1..=4).map(|s| Competitor::new(format!("T{s}"), s)).collect();
    let ids: Vec<CompetitorId> = competitors.iter().map(|c| c.id).collect();
    let game = |a: usize, b: usize, winner: usize| {
        let mut m = GameMatch::new(ids[a], ids[b], MatchFormat::BestOfOne);
        m.set_winner(ids[winner], WinnerSource::Reported).unwrap();
        m
    };
    let mut r1 = Round::new(1);
    r1.matches = vec![game(0, 2, 0), game(1, 3, 1)];
    let mut r2 = Round::new(2);
    r2.matches = vec![game(0, 1, 0), game(2, 3, 2)];

    let mut stage = Stage::new("s1", "Stage 1", StageKind::Swiss).with_competitors(competitors);
    stage.rounds = vec![r1, r2];
    (stage, ids)
}

#[test]
fn records_replay_decided_matches() {
    let (stage, ids) = played_stage();
    let records = compute_records(&stage, 1).unwrap();

    assert_eq!(records[&ids[0]].record, Record::new(2, 0));
    assert_eq!(records[&ids[1]].record, Record::new(1, 1));
    assert_eq!(records[&ids[2]].record, Record::new(1, 1));
    assert_eq!(records[&ids[3]].record, Record::new(0, 2));
    assert_eq!(records[&ids[0]].opponents, vec![ids[2], ids[1]]);
}

#[test]
fn records_before_the_first_round_are_empty() {
    let (stage, ids) = played_stage();
    let records = records_before(&stage, 0).unwrap();
    assert_eq!(records.len(), 4);
    assert!(ids.iter().all(|id| records[id].record == Record::default()));
}

#[test]
fn undecided_matches_do_not_count() {
    let (mut stage, ids) = played_stage();
    stage.rounds[1].matches[0].clear_winner();
    let records = compute_records(&stage, 1).unwrap();
    assert_eq!(records[&ids[0]].record, Record::new(1, 0));
    assert_eq!(records[&ids[0]].opponents, vec![ids[2]]);
}

#[test]
fn out_of_range_round_is_a_stage_index_error() {
    let (stage, _) = played_stage();
    assert_eq!(
        compute_records(&stage, 2),
        Err(TournamentError::StageIndex {
            stage: "s1".to_string(),
            round: 2
        })
    );
    assert!(records_before(&stage, 3).is_err());
}

#[test]
fn buchholz_sums_opponent_differentials() {
    let (stage, ids) = played_stage();

    // As of round 2: each round-1 opponent is at +1 or -1.
    let before_round_2 = records_before(&stage, 1).unwrap();
    assert_eq!(compute_buchholz(ids[0], &before_round_2), -1);
    assert_eq!(compute_buchholz(ids[2], &before_round_2), 1);

    // After round 2: T1 faced T3 (1-1) and T2 (1-1).
    let after = compute_records(&stage, 1).unwrap();
    assert_eq!(compute_buchholz(ids[0], &after), 0);
    // T4 faced T2 (1-1) and T3 (1-1).
    assert_eq!(compute_buchholz(ids[3], &after), 0);
    // T2 faced T4 (0-2) and T1 (2-0).
    assert_eq!(compute_buchholz(ids[1], &after), 0);
    // T3 faced T1 (2-0) and T4 (0-2).
    assert_eq!(compute_buchholz(ids[2], &after), 0);
}

#[test]
fn buchholz_is_zero_before_any_match_and_for_unknown_ids() {
    let (stage, ids) = played_stage();
    let records = records_before(&stage, 0).unwrap();
    assert!(buchholz_scores(&records).values().all(|&b| b == 0));
    assert_eq!(compute_buchholz(uuid::Uuid::new_v4(), &records), 0);
    assert_eq!(compute_buchholz(ids[0], &records), 0);
}

#[test]
fn replay_is_deterministic() {
    let (stage, _) = played_stage();
    let a = compute_records(&stage, 1).unwrap();
    let b = compute_records(&stage, 1).unwrap();
    assert_eq!(a, b);
    assert_eq!(buchholz_scores(&a), buchholz_scores(&b));
}

#[test]
fn competitors_as_of_leaves_the_stage_untouched() {
    let (stage, ids) = played_stage();
    let snapshot = competitors_as_of(&stage, 1).unwrap();
    let first = snapshot.iter().find(|c| c.id == ids[0]).unwrap();
    assert_eq!((first.wins, first.losses, first.buchholz), (1, 0, -1));
    assert!(stage.competitors.iter().all(|c| c.wins == 0 && c.opponents.is_empty()));
}
