//! Round orchestration for a stage: pair each round, merge known results, resolve
//! the rest by seed and recompute round statuses.

use super::bracket::advance_bracket;
use super::pairing::pair_next_round;
use super::records::{apply_records, compute_records, records_before};
use crate::models::{
    GameMatch, KnownResults, MatchFormat, PairKey, Round, RoundStatus, Stage, StageKind,
    TournamentError, WinnerSource,
};
use std::collections::{HashMap, HashSet};

/// Bring a stage to full resolution against the known results.
///
/// Swiss rounds are re-paired from the results before them; a round whose pairings
/// come out the same keeps its matches, so match identity survives. Undecided Swiss
/// matches are resolved by seed as a placeholder prediction. Playoff stages go
/// through the bracket, which never predicts.
pub fn advance(stage: &mut Stage, known: &KnownResults) -> Result<(), TournamentError> {
    match stage.kind {
        StageKind::Swiss => advance_swiss(stage, known),
        StageKind::Playoff => advance_bracket(stage, known),
    }
}

fn advance_swiss(stage: &mut Stage, known: &KnownResults) -> Result<(), TournamentError> {
    stage.warnings.clear();
    stage.reset_records();
    stage.ensure_rounds();

    let mut consumed = HashSet::new();
    for idx in 0..stage.rounds.len() {
        let records = records_before(stage, idx)?;
        apply_records(stage, &records);

        let outcome = pair_next_round(stage, idx)?;
        let round = &mut stage.rounds[idx];
        if !keep_pairings(round, &outcome.matches) {
            if !round.matches.is_empty() {
                log::info!(
                    "Stage {}: round {} pairings changed, regenerating",
                    stage.id,
                    round.number
                );
            }
            round.matches = outcome.matches;
        }
        stage.warnings.extend(outcome.warnings);

        let stage_id = stage.id.clone();
        merge_known_results(&mut stage.rounds[idx], known, &stage_id, &mut consumed);
        resolve_by_seed(stage, idx)?;
    }

    let last = stage.rounds.len().saturating_sub(1);
    let records = compute_records(stage, last)?;
    apply_records(stage, &records);
    update_round_statuses(stage);
    Ok(())
}

/// Keep the existing matches (ids) when they pair exactly the competitors the generator
/// pairs now. Formats are refreshed and every winner and detail is dropped; the merge
/// puts back whatever the known results still say.
fn keep_pairings(round: &mut Round, generated: &[GameMatch]) -> bool {
    if round.matches.is_empty() || round.matches.len() != generated.len() {
        return false;
    }
    let formats: HashMap<PairKey, MatchFormat> = generated
        .iter()
        .filter_map(|m| Some((m.pair_key()?, m.format)))
        .collect();
    let existing: HashSet<PairKey> = round.matches.iter().filter_map(GameMatch::pair_key).collect();
    if existing.len() != round.matches.len() || existing.iter().any(|p| !formats.contains_key(p)) {
        return false;
    }
    for m in &mut round.matches {
        if let Some(format) = m.pair_key().and_then(|p| formats.get(&p)) {
            m.format = *format;
        }
        m.clear_winner();
        m.detail = None;
    }
    true
}

/// Apply known results to a round's matches by pair identity. A known winner
/// overrides whatever the match held before.
///
/// A result without a round number is used once per pass: `consumed` holds the pairs
/// whose round-less result already went to an earlier meeting, so a rematch later in
/// the stage is not decided by the same result again.
pub(crate) fn merge_known_results(
    round: &mut Round,
    known: &KnownResults,
    stage_id: &str,
    consumed: &mut HashSet<PairKey>,
) {
    if known.is_empty() {
        return;
    }
    for m in &mut round.matches {
        let Some(pair) = m.pair_key() else {
            continue;
        };
        let result = match known.for_round(round.number, pair) {
            Some(result) => result,
            None => match known.any_round(pair) {
                Some(result) if consumed.insert(pair) => result,
                _ => continue,
            },
        };
        match m.set_winner(result.winner, WinnerSource::Reported) {
            Ok(()) => {
                if let Some(detail) = &result.detail {
                    m.detail = Some(detail.clone());
                }
            }
            Err(e) => log::warn!(
                "Stage {} round {}: ignoring known result: {}",
                stage_id,
                round.number,
                e
            ),
        }
    }
}

/// Decide every still-open match in the round: the lower seed wins.
fn resolve_by_seed(stage: &mut Stage, idx: usize) -> Result<(), TournamentError> {
    let mut decisions = Vec::new();
    for (mi, m) in stage.rounds[idx].matches.iter().enumerate() {
        if m.is_decided() {
            continue;
        }
        let (Some(a), Some(b)) = (m.team_1.id(), m.team_2.id()) else {
            continue;
        };
        let a = stage.competitor(a).ok_or(TournamentError::CompetitorNotFound(a))?;
        let b = stage.competitor(b).ok_or(TournamentError::CompetitorNotFound(b))?;
        let winner = if (a.seed, a.id) < (b.seed, b.id) { a.id } else { b.id };
        decisions.push((mi, winner));
    }
    for (mi, winner) in decisions {
        stage.rounds[idx].matches[mi].set_winner(winner, WinnerSource::Simulated)?;
    }
    Ok(())
}

/// Completed rounds first, then the single active round (earliest populated round
/// without a full set of reported results), then pending.
///
/// Seed predictions do not complete a round; only reported results do.
pub fn update_round_statuses(stage: &mut Stage) {
    let mut active_set = false;
    for round in &mut stage.rounds {
        round.status = if active_set {
            RoundStatus::Pending
        } else if round.is_reported() {
            RoundStatus::Completed
        } else if round.is_populated() {
            active_set = true;
            RoundStatus::Active
        } else {
            RoundStatus::Pending
        };
    }
}
