//! Whole-tournament propagation: advance each stage in order and promote its
//! qualifiers into the next one.

use super::bracket::redecide;
use super::promotion::{compute_qualified, is_ready_to_promote, promote};
use super::rounds::advance;
use crate::models::{
    CompetitorId, KnownResult, KnownResults, ResultsByStage, StageKind, StageProgress,
    StageWarning, Tournament, TournamentError,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Outcome of one stage after a propagation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageSummary {
    pub stage: String,
    pub progress: StageProgress,
    /// Qualifiers handed to the next stage, best first. Empty for the last stage.
    pub qualified: Vec<CompetitorId>,
    pub warnings: Vec<StageWarning>,
}

/// Outcome of a propagation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropagationReport {
    pub stages: Vec<StageSummary>,
    /// Winner of the final, if the tournament ends in a decided playoff.
    pub champion: Option<CompetitorId>,
}

/// Run the full pass over every stage.
///
/// Every stage after the first is regenerated from its roster and the known results.
/// The pass runs on a copy; on error the caller's tournament is left as it was.
pub fn propagate(
    tournament: &mut Tournament,
    results: &ResultsByStage,
) -> Result<PropagationReport, TournamentError> {
    let mut working = tournament.clone();
    let report = run(&mut working, results)?;
    working.updated_at = Utc::now();
    *tournament = working;
    Ok(report)
}

fn run(
    tournament: &mut Tournament,
    results: &ResultsByStage,
) -> Result<PropagationReport, TournamentError> {
    let empty = KnownResults::new();
    let count = tournament.stages.len();
    let mut summaries = Vec::with_capacity(count);

    for idx in 0..count {
        let (done, rest) = tournament.stages.split_at_mut(idx + 1);
        let stage = &mut done[idx];
        let known = results.get(&stage.id).unwrap_or(&empty);
        advance(stage, known)?;

        let qualified = match rest.first_mut() {
            Some(next) => {
                let qualified = if is_ready_to_promote(stage) {
                    compute_qualified(stage)
                } else {
                    log::debug!("Stage {}: nobody has finished yet", stage.id);
                    Vec::new()
                };
                let seed = next.starting_seed;
                promote(&qualified, next, seed);
                next.rounds.clear();
                next.warnings.clear();
                qualified
            }
            None => Vec::new(),
        };

        let progress = stage.progress();
        log::info!(
            "Stage {}: {:?}, {} competitor(s), {} qualified, {} warning(s)",
            stage.id,
            progress,
            stage.competitors.len(),
            qualified.len(),
            stage.warnings.len()
        );
        summaries.push(StageSummary {
            stage: stage.id.clone(),
            progress,
            qualified: qualified.iter().map(|c| c.id).collect(),
            warnings: stage.warnings.clone(),
        });
    }

    let champion = tournament.champion().map(|c| c.id);
    Ok(PropagationReport {
        stages: summaries,
        champion,
    })
}

/// Record one authoritative result and propagate.
///
/// If the result changes the winner of a match already in the first stage, everything
/// that depended on the old winner is discarded first: later Swiss rounds, or the
/// bracket slots downstream of the match. Later stages need no such step, since the
/// pass rebuilds their rounds from the promoted roster. On error neither the tournament
/// nor the results change.
pub fn submit_result(
    tournament: &mut Tournament,
    results: &mut ResultsByStage,
    stage_id: &str,
    result: KnownResult,
) -> Result<PropagationReport, TournamentError> {
    let stage_idx = tournament.stage_index(stage_id)?;
    if !result.pair.contains(result.winner) {
        return Err(TournamentError::InvalidWinner {
            winner: result.winner,
        });
    }

    let mut working = tournament.clone();
    let stage = &mut working.stages[stage_idx];
    let located = stage.rounds.iter().enumerate().find_map(|(ri, round)| {
        if result.round.is_some_and(|n| n != round.number) {
            return None;
        }
        round.find_pair(result.pair).map(|mi| (ri, mi))
    });
    if let Some((ri, mi)) = located.filter(|_| stage_idx == 0) {
        if stage.rounds[ri].matches[mi].winner != Some(result.winner) {
            log::info!(
                "Stage {} round {}: result changes the winner, discarding dependent matches",
                stage.id,
                ri + 1
            );
            match stage.kind {
                StageKind::Swiss => stage.clear_rounds_from(ri + 1),
                StageKind::Playoff => redecide(stage, ri, mi, Some(result.winner))?,
            }
        }
    }

    let mut next_results = results.clone();
    next_results
        .entry(stage_id.to_string())
        .or_default()
        .insert(result);
    let report = propagate(&mut working, &next_results)?;

    *tournament = working;
    *results = next_results;
    Ok(report)
}
