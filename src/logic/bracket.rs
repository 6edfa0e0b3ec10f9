//! Playoff bracket: 8 competitors, quarterfinals through the final (single elimination).

use super::records::{apply_records, compute_records};
use super::rounds::{merge_known_results, update_round_statuses};
use crate::models::{
    Competitor, CompetitorId, GameMatch, KnownResults, MatchFormat, PairKey, Round, Slot, Stage,
    TournamentError, WinnerSource,
};
use std::collections::HashSet;

/// Competitors in a playoff stage.
pub const BRACKET_SIZE: usize = 8;

/// Matches per round: quarterfinals, semifinals, final.
const ROUND_SIZES: [usize; 3] = [4, 2, 1];

/// Quarterfinal pairings by seed rank (0-based): 1v8, 4v5, 2v7, 3v6.
/// Semifinal `m` is fed by quarterfinals `2m` and `2m + 1`, so 1 and 2 can only meet in the final.
const QUARTERFINAL_SEEDS: [(usize, usize); 4] = [(0, 7), (3, 4), (1, 6), (2, 5)];

fn seeded(stage: &Stage) -> Result<Vec<&Competitor>, TournamentError> {
    if stage.competitors.len() != BRACKET_SIZE {
        return Err(TournamentError::BracketShape {
            competitors: stage.competitors.len(),
            rounds: stage.rounds.len(),
        });
    }
    let mut sorted: Vec<&Competitor> = stage.competitors.iter().collect();
    sorted.sort_by_key(|c| (c.seed, c.id));
    Ok(sorted)
}

fn quarterfinal_pairs(stage: &Stage) -> Result<Vec<(CompetitorId, CompetitorId)>, TournamentError> {
    let sorted = seeded(stage)?;
    Ok(QUARTERFINAL_SEEDS
        .iter()
        .map(|&(high, low)| (sorted[high].id, sorted[low].id))
        .collect())
}

fn check_shape(stage: &Stage) -> Result<(), TournamentError> {
    let shaped = stage.competitors.len() == BRACKET_SIZE
        && stage.rounds.len() == ROUND_SIZES.len()
        && stage
            .rounds
            .iter()
            .zip(ROUND_SIZES)
            .all(|(round, size)| round.matches.len() == size);
    if shaped {
        Ok(())
    } else {
        Err(TournamentError::BracketShape {
            competitors: stage.competitors.len(),
            rounds: stage.rounds.len(),
        })
    }
}

/// Build the bracket skeleton: seeded quarterfinals, then unassigned semifinal and final slots.
/// Every playoff match is best of three. Replaces any existing rounds.
pub fn build_bracket(stage: &mut Stage) -> Result<(), TournamentError> {
    let pairs = quarterfinal_pairs(stage)?;
    let mut rounds = Vec::with_capacity(ROUND_SIZES.len());
    for (idx, size) in ROUND_SIZES.into_iter().enumerate() {
        let mut round = Round::new(idx as u32 + 1);
        round.matches = if idx == 0 {
            pairs
                .iter()
                .map(|&(a, b)| GameMatch::new(a, b, MatchFormat::BestOfThree))
                .collect()
        } else {
            (0..size)
                .map(|_| GameMatch::placeholder(MatchFormat::BestOfThree))
                .collect()
        };
        rounds.push(round);
    }
    stage.rounds = rounds;
    stage.warnings.clear();
    log::debug!("Stage {}: bracket built", stage.id);
    Ok(())
}

/// The existing rounds are the bracket this roster seeds into.
fn bracket_is_current(stage: &Stage) -> Result<bool, TournamentError> {
    let expected = quarterfinal_pairs(stage)?;
    if check_shape(stage).is_err() {
        return Ok(false);
    }
    Ok(stage.rounds[0]
        .matches
        .iter()
        .zip(&expected)
        .all(|(m, &(a, b))| m.pair_key() == Some(PairKey::new(a, b))))
}

/// Fill every later-round slot from its two feeder matches.
///
/// A slot is filled only once both feeders are decided; otherwise it is reset to
/// unassigned. A slot whose competitors change loses its winner. Returns the number
/// of slots written, so a second run over the same state returns 0.
pub fn propagate(stage: &mut Stage) -> Result<usize, TournamentError> {
    check_shape(stage)?;
    let mut writes = 0;
    for r in 1..stage.rounds.len() {
        for m in 0..stage.rounds[r].matches.len() {
            let feeders = (
                stage.rounds[r - 1].matches[2 * m].winner,
                stage.rounds[r - 1].matches[2 * m + 1].winner,
            );
            let slot = &mut stage.rounds[r].matches[m];
            match feeders {
                (Some(a), Some(b)) => {
                    if slot.team_1 != Slot::Filled(a) || slot.team_2 != Slot::Filled(b) {
                        slot.unassign();
                        slot.team_1 = Slot::Filled(a);
                        slot.team_2 = Slot::Filled(b);
                        writes += 1;
                    }
                }
                _ => {
                    if slot.team_1.is_assigned() || slot.team_2.is_assigned() || slot.is_decided() {
                        slot.unassign();
                        writes += 1;
                    }
                }
            }
        }
    }
    Ok(writes)
}

/// Change (or clear) the result of one bracket match, reset every match downstream
/// of it and propagate again.
pub fn redecide(
    stage: &mut Stage,
    round_index: usize,
    match_index: usize,
    winner: Option<CompetitorId>,
) -> Result<(), TournamentError> {
    check_shape(stage)?;
    let m = stage
        .rounds
        .get_mut(round_index)
        .and_then(|r| r.matches.get_mut(match_index))
        .ok_or(TournamentError::MatchNotFound)?;
    if m.winner == winner {
        return Ok(());
    }
    match winner {
        Some(w) => m.set_winner(w, WinnerSource::Reported)?,
        None => m.clear_winner(),
    }

    let mut idx = match_index;
    for r in round_index + 1..stage.rounds.len() {
        idx /= 2;
        stage.rounds[r].matches[idx].unassign();
    }
    propagate(stage)?;
    Ok(())
}

/// Quarterfinals lose their winners, later slots go back to unassigned.
fn clear_results(stage: &mut Stage) {
    for (idx, round) in stage.rounds.iter_mut().enumerate() {
        for m in &mut round.matches {
            if idx == 0 {
                m.clear_winner();
                m.detail = None;
            } else {
                m.unassign();
            }
        }
    }
}

/// Advance a playoff stage against the known results.
///
/// An empty roster leaves the stage without rounds. The bracket is rebuilt when the
/// roster no longer seeds into the existing quarterfinals; otherwise its matches keep
/// their ids but every result is dropped and merged again from `known`.
pub(crate) fn advance_bracket(stage: &mut Stage, known: &KnownResults) -> Result<(), TournamentError> {
    if stage.competitors.is_empty() {
        stage.rounds.clear();
        stage.warnings.clear();
        return Ok(());
    }
    stage.reset_records();
    if bracket_is_current(stage)? {
        clear_results(stage);
    } else {
        build_bracket(stage)?;
    }
    stage.warnings.clear();

    let mut consumed = HashSet::new();
    for idx in 0..stage.rounds.len() {
        let stage_id = stage.id.clone();
        merge_known_results(&mut stage.rounds[idx], known, &stage_id, &mut consumed);
        propagate(stage)?;
    }

    let last = stage.rounds.len() - 1;
    let records = compute_records(stage, last)?;
    apply_records(stage, &records);
    update_round_statuses(stage);
    if let Some(champion) = stage.final_winner().and_then(|id| stage.competitor(id)) {
        log::info!("Stage {}: {} wins the final", stage.id, champion.name);
    }
    Ok(())
}
