//! Integration tests for tournament configuration and CSV import.

use swiss_playoff_engine::import::{read_results, read_roster, stable_id};
use swiss_playoff_engine::{
    propagate, KnownResult, PairKey, StageKind, TournamentConfig, TournamentError,
};

const CONFIG: &str = r#"{
    "name": "Regional",
    "stages": [
        { "id": "swiss", "name": "Swiss Stage", "kind": "SWISS" },
        { "id": "playoffs", "name": "Playoffs", "kind": "PLAYOFF", "starting_seed": 1 }
    ]
}"#;

#[test]
fn major_layout_matches_the_default_seeding() {
    let config = TournamentConfig::major("Major");
    config.validate().unwrap();
    let layout: Vec<(&str, StageKind, u32)> = config
        .stages
        .iter()
        .map(|s| (s.id.as_str(), s.kind, s.starting_seed))
        .collect();
    assert_eq!(
        layout,
        vec![
            ("stage-1", StageKind::Swiss, 1),
            ("stage-2", StageKind::Swiss, 17),
            ("stage-3", StageKind::Swiss, 9),
            ("playoffs", StageKind::Playoff, 1),
        ]
    );
}

#[test]
fn config_parses_from_json_and_builds_empty_stages() {
    let config = TournamentConfig::from_json(CONFIG).unwrap();
    let t = config.build().unwrap();
    assert_eq!(t.name, "Regional");
    assert_eq!(t.stages.len(), 2);
    assert_eq!(t.stages[0].starting_seed, 1);
    assert_eq!(t.stages[1].kind, StageKind::Playoff);
    assert!(t.stages.iter().all(|s| s.competitors.is_empty() && s.rounds.is_empty()));
}

#[test]
fn invalid_configs_are_rejected() {
    let empty = r#"{ "name": "x", "stages": [] }"#;
    let duplicate = r#"{ "name": "x", "stages": [
        { "id": "a", "name": "A", "kind": "SWISS" },
        { "id": "a", "name": "B", "kind": "SWISS" } ] }"#;
    let zero_seed = r#"{ "name": "x", "stages": [
        { "id": "a", "name": "A", "kind": "SWISS", "starting_seed": 0 } ] }"#;
    let early_playoff = r#"{ "name": "x", "stages": [
        { "id": "p", "name": "P", "kind": "PLAYOFF" },
        { "id": "a", "name": "A", "kind": "SWISS" } ] }"#;
    let malformed = r#"{ "name": "x" "#;

    for json in [empty, duplicate, zero_seed, early_playoff, malformed] {
        assert!(
            matches!(TournamentConfig::from_json(json), Err(TournamentError::InvalidConfig(_))),
            "accepted: {json}"
        );
    }
}

#[test]
fn roster_import_fills_stages_and_derives_stable_ids() {
    let mut t = TournamentConfig::from_json(CONFIG).unwrap().build().unwrap();
    let explicit = uuid::Uuid::new_v4();
    let csv = format!(
        "stage,id,name,seed\nswiss,{explicit},Alpha,1\nswiss,,Bravo,2\nswiss,,Charlie,3\nswiss,,Bravo,9\n"
    );
    let added = read_roster(csv.as_bytes(), &mut t).unwrap();

    assert_eq!(added, 3);
    let stage = &t.stages[0];
    assert_eq!(stage.competitors[0].id, explicit);
    assert_eq!(stage.competitors[1].id, stable_id("Bravo"));
    assert_eq!(stable_id("bravo "), stable_id("Bravo"));
    assert_eq!(stage.competitors[1].seed, 2);
}

#[test]
fn roster_import_rejects_unknown_stages_without_partial_changes() {
    let mut t = TournamentConfig::from_json(CONFIG).unwrap().build().unwrap();
    let csv = "stage,id,name,seed\nswiss,,Alpha,1\nmissing,,Bravo,2\n";
    assert!(matches!(
        read_roster(csv.as_bytes(), &mut t),
        Err(TournamentError::UnknownStage(_))
    ));
    assert!(t.stages[0].competitors.is_empty());

    let bad_seed = "stage,id,name,seed\nswiss,,Alpha,first\n";
    assert!(matches!(
        read_roster(bad_seed.as_bytes(), &mut t),
        Err(TournamentError::Import(_))
    ));
}

#[test]
fn results_import_groups_by_stage_and_keeps_the_score() {
    let (a, b, c) = (stable_id("Alpha"), stable_id("Bravo"), stable_id("Charlie"));
    let csv = format!(
        "stage,round,team_1,team_2,winner,score\nswiss,1,{a},{b},{a},16-9\nswiss,,{b},{c},{c},\nplayoffs,1,{a},{c},{c},2-1\n"
    );
    let results = read_results(csv.as_bytes()).unwrap();

    assert_eq!(results["swiss"].len(), 2);
    assert_eq!(results["playoffs"].len(), 1);

    let first = results["swiss"].lookup(1, PairKey::new(b, a)).unwrap();
    assert_eq!(first.winner, a);
    assert_eq!(first.detail, Some(serde_json::json!({ "score": "16-9" })));

    // No round given: the lookup falls back to it whatever round is asked for.
    let any = results["swiss"].lookup(4, PairKey::new(b, c)).unwrap();
    assert_eq!(any, &KnownResult::new(b, c, c));
}

#[test]
fn results_import_rejects_a_winner_outside_the_pair() {
    let (a, b, c) = (stable_id("Alpha"), stable_id("Bravo"), stable_id("Charlie"));
    let csv = format!("stage,round,team_1,team_2,winner,score\nswiss,1,{a},{b},{c},\n");
    assert!(matches!(
        read_results(csv.as_bytes()),
        Err(TournamentError::Import(_))
    ));
}

#[test]
fn imported_tournament_propagates() {
    let mut t = TournamentConfig::from_json(CONFIG).unwrap().build().unwrap();
    let mut csv = String::from("stage,id,name,seed\n");
    for seed in 1..=16 {
        csv.push_str(&format!("swiss,,Team {seed},{seed}\n"));
    }
    read_roster(csv.as_bytes(), &mut t).unwrap();

    let results = read_results("stage,round,team_1,team_2,winner,score\n".as_bytes()).unwrap();
    let report = propagate(&mut t, &results).unwrap();
    assert_eq!(report.stages[0].qualified.len(), 8);
    assert_eq!(t.stages[1].competitors.len(), 8);
}
