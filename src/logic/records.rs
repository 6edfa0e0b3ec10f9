//! Record bookkeeping: wins, losses and opponents replayed from decided matches.

use crate::models::{Competitor, CompetitorId, Record, Stage, TournamentError};
use std::collections::HashMap;

/// One competitor's record and opponent history.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RecordBook {
    pub record: Record,
    pub opponents: Vec<CompetitorId>,
}

/// Record books for every competitor on a stage's roster.
pub type Records = HashMap<CompetitorId, RecordBook>;

/// Replay every decided match in rounds `0..=through_round`.
///
/// Pure: the stage is not touched. Every roster competitor gets an entry, even with no matches.
pub fn compute_records(stage: &Stage, through_round: usize) -> Result<Records, TournamentError> {
    if through_round >= stage.rounds.len() {
        return Err(TournamentError::StageIndex {
            stage: stage.id.clone(),
            round: through_round,
        });
    }
    Ok(replay(stage, through_round + 1))
}

/// Records as they stood when round `round_index` began (all zero for the first round).
pub fn records_before(stage: &Stage, round_index: usize) -> Result<Records, TournamentError> {
    if round_index > stage.rounds.len() {
        return Err(TournamentError::StageIndex {
            stage: stage.id.clone(),
            round: round_index,
        });
    }
    Ok(replay(stage, round_index))
}

fn replay(stage: &Stage, round_count: usize) -> Records {
    let mut records: Records = stage
        .competitors
        .iter()
        .map(|c| (c.id, RecordBook::default()))
        .collect();

    for m in stage.rounds.iter().take(round_count).flat_map(|r| &r.matches) {
        let (Some(winner), Some(loser)) = (m.winner, m.loser()) else {
            continue;
        };
        if !records.contains_key(&winner) || !records.contains_key(&loser) {
            log::warn!(
                "Stage {}: skipping match {} with a competitor off the roster",
                stage.id,
                m.id
            );
            continue;
        }
        if let Some(book) = records.get_mut(&winner) {
            book.record.wins += 1;
            if !book.opponents.contains(&loser) {
                book.opponents.push(loser);
            }
        }
        if let Some(book) = records.get_mut(&loser) {
            book.record.losses += 1;
            if !book.opponents.contains(&winner) {
                book.opponents.push(winner);
            }
        }
    }
    records
}

/// Copy of the roster with records and Buchholz as they stood when round `round_index` began.
pub fn competitors_as_of(
    stage: &Stage,
    round_index: usize,
) -> Result<Vec<Competitor>, TournamentError> {
    let records = records_before(stage, round_index)?;
    let mut competitors = stage.competitors.clone();
    apply_to_competitors(&mut competitors, &records);
    Ok(competitors)
}

/// Write records and the Buchholz they imply onto the stage's competitors.
pub fn apply_records(stage: &mut Stage, records: &Records) {
    apply_to_competitors(&mut stage.competitors, records);
}

fn apply_to_competitors(competitors: &mut [Competitor], records: &Records) {
    let scores = super::buchholz::buchholz_scores(records);
    for c in competitors.iter_mut() {
        c.reset_record();
        if let Some(book) = records.get(&c.id) {
            c.wins = book.record.wins;
            c.losses = book.record.losses;
            for &opponent in &book.opponents {
                c.add_opponent(opponent);
            }
        }
        c.buchholz = scores.get(&c.id).copied().unwrap_or(0);
    }
}
