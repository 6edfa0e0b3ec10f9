//! Integration tests for Swiss pairing: first round, record groups, rematch avoidance.

use swiss_playoff_engine::logic::{
    format_for, group_by_record, pair_by_record, pair_first_round, pair_next_round,
    PairingHistory,
};
use swiss_playoff_engine::{
    advance, Competitor, KnownResults, MatchFormat, Record, Stage, StageKind, StageWarning,
};

fn roster(n: u32) -> Vec<Competitor> {
    (1..=n).map(|s| Competitor::new(format!("T{s}"), s)).collect()
}

fn with_record(seed: u32, wins: u32, losses: u32) -> Competitor {
    let mut c = Competitor::new(format!("T{seed}"), seed);
    c.wins = wins;
    c.losses = losses;
    c
}

fn seeds_of(competitors: &[Competitor], m: &swiss_playoff_engine::GameMatch) -> (u32, u32) {
    let seed = |id| competitors.iter().find(|c| c.id == id).unwrap().seed;
    let (a, b) = (seed(m.team_1.id().unwrap()), seed(m.team_2.id().unwrap()));
    (a.min(b), a.max(b))
}

#[test]
fn first_round_pairs_top_half_against_bottom_half() {
    let competitors = roster(16);
    let outcome = pair_first_round(&competitors, 1);
    let pairs: Vec<_> = outcome.matches.iter().map(|m| seeds_of(&competitors, m)).collect();
    assert_eq!(
        pairs,
        vec![(1, 9), (2, 10), (3, 11), (4, 12), (5, 13), (6, 14), (7, 15), (8, 16)]
    );
    assert!(outcome.warnings.is_empty());
    assert!(outcome.matches.iter().all(|m| m.format == MatchFormat::BestOfOne));
}

#[test]
fn first_round_ignores_roster_order() {
    let mut competitors = roster(8);
    competitors.reverse();
    let outcome = pair_first_round(&competitors, 1);
    let pairs: Vec<_> = outcome.matches.iter().map(|m| seeds_of(&competitors, m)).collect();
    assert_eq!(pairs, vec![(1, 5), (2, 6), (3, 7), (4, 8)]);
}

#[test]
fn odd_roster_leaves_worst_seed_unpaired_with_warning() {
    let competitors = roster(5);
    let outcome = pair_first_round(&competitors, 1);
    assert_eq!(outcome.matches.len(), 2);
    let odd = competitors.iter().find(|c| c.seed == 5).unwrap();
    assert_eq!(
        outcome.warnings,
        vec![StageWarning::OddCompetitorCount {
            round: 1,
            competitor: odd.id
        }]
    );
}

#[test]
fn fewer_than_two_competitors_produces_no_matches() {
    let outcome = pair_first_round(&roster(1), 1);
    assert!(outcome.matches.is_empty());
    assert_eq!(
        outcome.warnings,
        vec![StageWarning::InsufficientCompetitors { round: 1, active: 1 }]
    );
}

#[test]
fn second_round_pairs_within_record_groups() {
    let mut stage = Stage::new("s1", "Stage 1", StageKind::Swiss).with_competitors(roster(16));
    advance(&mut stage, &KnownResults::new()).unwrap();

    let round_2 = &stage.rounds[1];
    let pairs: Vec<_> = round_2
        .matches
        .iter()
        .map(|m| seeds_of(&stage.competitors, m))
        .collect();
    assert_eq!(
        pairs,
        vec![(1, 8), (2, 7), (3, 6), (4, 5), (9, 16), (10, 15), (11, 14), (12, 13)]
    );
    assert!(round_2.matches.iter().all(|m| m.format == MatchFormat::BestOfOne));
}

#[test]
fn decisive_records_play_best_of_three() {
    let mut stage = Stage::new("s1", "Stage 1", StageKind::Swiss).with_competitors(roster(16));
    advance(&mut stage, &KnownResults::new()).unwrap();

    // Round 3: 2-0 and 0-2 groups are one result from finishing.
    for m in &stage.rounds[2].matches {
        let (a, _) = seeds_of(&stage.competitors, m);
        let expected = if a <= 4 || a >= 13 {
            MatchFormat::BestOfThree
        } else {
            MatchFormat::BestOfOne
        };
        assert_eq!(m.format, expected, "match with seed {a}");
    }
    assert_eq!(
        format_for(&with_record(1, 2, 1), &with_record(2, 1, 1)),
        MatchFormat::BestOfThree
    );
    assert_eq!(
        format_for(&with_record(1, 1, 1), &with_record(2, 1, 0)),
        MatchFormat::BestOfOne
    );
}

#[test]
fn groups_are_ordered_best_record_first_then_buchholz_then_seed() {
    let mut a = with_record(4, 1, 1);
    a.buchholz = 2;
    let b = with_record(1, 1, 1);
    let c = with_record(2, 2, 0);
    let d = with_record(3, 0, 2);
    let refs = vec![&a, &b, &c, &d];
    let groups = group_by_record(&refs);

    let keys: Vec<Record> = groups.keys().copied().collect();
    assert_eq!(keys, vec![Record::new(2, 0), Record::new(1, 1), Record::new(0, 2)]);
    let middle: Vec<u32> = groups[&Record::new(1, 1)].iter().map(|c| c.seed).collect();
    assert_eq!(middle, vec![4, 1]);
}

#[test]
fn pairing_avoids_rematches() {
    let mut competitors: Vec<Competitor> = (1..=4).map(|s| with_record(s, 1, 1)).collect();
    let (a, d) = (competitors[0].id, competitors[3].id);
    competitors[0].opponents.push(d);
    competitors[3].opponents.push(a);

    let history = PairingHistory::from_competitors(&competitors);
    let outcome = pair_by_record("s1", &competitors, &history, 3);
    let pairs: Vec<_> = outcome.matches.iter().map(|m| seeds_of(&competitors, m)).collect();
    assert_eq!(pairs, vec![(1, 3), (2, 4)]);
    assert!(outcome.warnings.is_empty());
}

#[test]
fn pairing_looks_ahead_to_avoid_forcing_the_last_pair_into_a_rematch() {
    let mut competitors: Vec<Competitor> = (1..=4).map(|s| with_record(s, 1, 1)).collect();
    let ids: Vec<_> = competitors.iter().map(|c| c.id).collect();
    // 1 has met 4, and 2 has met 4: taking 3 for seed 1 would leave 2 v 4.
    competitors[0].opponents.push(ids[3]);
    competitors[3].opponents.extend([ids[0], ids[1]]);
    competitors[1].opponents.push(ids[3]);

    let history = PairingHistory::from_competitors(&competitors);
    let outcome = pair_by_record("s1", &competitors, &history, 3);
    let pairs: Vec<_> = outcome.matches.iter().map(|m| seeds_of(&competitors, m)).collect();
    assert_eq!(pairs, vec![(1, 2), (3, 4)]);
    assert!(outcome.warnings.is_empty());
}

#[test]
fn unavoidable_rematch_is_paired_and_flagged() {
    let mut competitors = vec![with_record(1, 2, 2), with_record(2, 2, 2)];
    let (a, b) = (competitors[0].id, competitors[1].id);
    competitors[0].opponents.push(b);
    competitors[1].opponents.push(a);

    let history = PairingHistory::from_competitors(&competitors);
    let outcome = pair_by_record("s1", &competitors, &history, 5);
    assert_eq!(outcome.matches.len(), 1);
    assert!(matches!(
        outcome.warnings.as_slice(),
        [StageWarning::ForcedRematch { round: 5, .. }]
    ));
}

#[test]
fn odd_groups_spill_into_the_leftover_pool() {
    let competitors = vec![
        with_record(1, 1, 0),
        with_record(2, 1, 0),
        with_record(3, 1, 0),
        with_record(4, 0, 1),
    ];
    let history = PairingHistory::default();
    let outcome = pair_by_record("s1", &competitors, &history, 2);
    let pairs: Vec<_> = outcome.matches.iter().map(|m| seeds_of(&competitors, m)).collect();
    // 1-0 group: 1 takes the worst-placed candidate (3); 2 spills over and meets 4.
    assert_eq!(pairs, vec![(1, 3), (2, 4)]);
    assert!(outcome.warnings.is_empty());
}

#[test]
fn finished_competitors_are_not_paired() {
    let competitors = vec![
        with_record(1, 3, 0),
        with_record(2, 0, 3),
        with_record(3, 2, 1),
        with_record(4, 2, 1),
    ];
    let outcome = pair_by_record("s1", &competitors, &PairingHistory::default(), 4);
    let pairs: Vec<_> = outcome.matches.iter().map(|m| seeds_of(&competitors, m)).collect();
    assert_eq!(pairs, vec![(3, 4)]);
}

#[test]
fn pair_next_round_rejects_missing_round() {
    let stage = Stage::new("s1", "Stage 1", StageKind::Swiss).with_competitors(roster(4));
    assert!(pair_next_round(&stage, 0).is_err());
}
