//! Swiss pairing: seed halves for the first round, record groups with rematch avoidance after.

use super::records::competitors_as_of;
use crate::models::{
    Competitor, GameMatch, MatchFormat, PairKey, Record, Stage, StageWarning, TournamentError,
};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

/// Matches for one round plus the non-fatal conditions met while pairing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PairingOutcome {
    pub matches: Vec<GameMatch>,
    pub warnings: Vec<StageWarning>,
}

/// Every pairing already used in the stage before the round being generated.
#[derive(Clone, Debug, Default)]
pub struct PairingHistory {
    pairs: HashSet<PairKey>,
}

impl PairingHistory {
    /// Pairs from rounds `0..round_index`, decided or not.
    pub fn before_round(stage: &Stage, round_index: usize) -> Self {
        let pairs = stage
            .rounds
            .iter()
            .take(round_index)
            .flat_map(|r| &r.matches)
            .filter_map(GameMatch::pair_key)
            .collect();
        Self { pairs }
    }

    /// Pairs from the competitors' recorded opponents.
    pub fn from_competitors(competitors: &[Competitor]) -> Self {
        let pairs = competitors
            .iter()
            .flat_map(|c| c.opponents.iter().map(move |&o| PairKey::new(c.id, o)))
            .collect();
        Self { pairs }
    }

    pub fn have_met(&self, a: &Competitor, b: &Competitor) -> bool {
        self.pairs.contains(&PairKey::new(a.id, b.id))
    }
}

/// Ranking of one candidate opponent for an anchor. Smaller is better.
///
/// Field order is the selection policy: avoid rematches, then avoid leaving the last
/// two in the pool as a rematch, then take the worst-placed candidate.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct CandidateScore {
    pub is_rematch: bool,
    pub forces_rematch: bool,
    pub position: Reverse<usize>,
}

/// Generate round `round_index` of a Swiss stage. The round must exist.
///
/// Records and Buchholz are derived from the stage's rounds before `round_index`,
/// so the result depends only on match history and seeds.
pub fn pair_next_round(
    stage: &Stage,
    round_index: usize,
) -> Result<PairingOutcome, TournamentError> {
    let number = stage.round(round_index)?.number;
    if round_index == 0 {
        return Ok(pair_first_round(&stage.competitors, number));
    }
    let competitors = competitors_as_of(stage, round_index)?;
    let history = PairingHistory::before_round(stage, round_index);
    Ok(pair_by_record(&stage.id, &competitors, &history, number))
}

/// First round: seed order, top half against bottom half (1 v n/2+1, 2 v n/2+2, ...).
pub fn pair_first_round(competitors: &[Competitor], round_number: u32) -> PairingOutcome {
    let mut outcome = PairingOutcome::default();
    let mut sorted: Vec<&Competitor> = competitors.iter().collect();
    sorted.sort_by_key(|c| (c.seed, c.id));

    if sorted.len() < 2 {
        log::warn!(
            "Round {}: only {} competitor(s), no matches generated",
            round_number,
            sorted.len()
        );
        outcome.warnings.push(StageWarning::InsufficientCompetitors {
            round: round_number,
            active: sorted.len(),
        });
        return outcome;
    }

    let half = sorted.len() / 2;
    for i in 0..half {
        let (high, low) = (sorted[i], sorted[i + half]);
        log::debug!(
            "Round {}: {} (#{}) vs {} (#{})",
            round_number,
            high.name,
            high.seed,
            low.name,
            low.seed
        );
        outcome
            .matches
            .push(GameMatch::new(high.id, low.id, format_for(high, low)));
    }
    if sorted.len() % 2 == 1 {
        let odd = sorted[sorted.len() - 1];
        log::warn!(
            "Round {}: odd roster, {} (#{}) is not paired",
            round_number,
            odd.name,
            odd.seed
        );
        outcome.warnings.push(StageWarning::OddCompetitorCount {
            round: round_number,
            competitor: odd.id,
        });
    }
    outcome
}

/// Later rounds: pair competitors still in contention within their record group.
///
/// `competitors` must carry the records and Buchholz in force before this round.
pub fn pair_by_record(
    stage_id: &str,
    competitors: &[Competitor],
    history: &PairingHistory,
    round_number: u32,
) -> PairingOutcome {
    let mut outcome = PairingOutcome::default();
    let active: Vec<&Competitor> = competitors
        .iter()
        .filter(|c| !c.record().is_finished())
        .collect();

    if active.is_empty() && !competitors.is_empty() {
        log::debug!(
            "Stage {} round {}: every competitor has finished, no matches generated",
            stage_id,
            round_number
        );
        return outcome;
    }
    if active.len() < 2 {
        log::warn!(
            "Stage {} round {}: {} active competitor(s), no matches generated",
            stage_id,
            round_number,
            active.len()
        );
        outcome.warnings.push(StageWarning::InsufficientCompetitors {
            round: round_number,
            active: active.len(),
        });
        return outcome;
    }

    // Even groups pair cleanly, so they go first; within a parity, best record first.
    let mut groups: Vec<(Record, Vec<&Competitor>)> = group_by_record(&active).into_iter().collect();
    groups.sort_by_key(|(_, members)| members.len() % 2);

    let mut leftovers = Vec::new();
    for (record, members) in groups {
        log::debug!(
            "Stage {} round {}: record {} has {} competitor(s)",
            stage_id,
            round_number,
            record,
            members.len()
        );
        leftovers.extend(pair_pool(members, history, round_number, &mut outcome));
    }

    if !leftovers.is_empty() {
        leftovers.sort_by_key(|c| (c.seed, c.id));
        log::debug!(
            "Stage {} round {}: pairing {} competitor(s) across record groups",
            stage_id,
            round_number,
            leftovers.len()
        );
        let rest = pair_pool(leftovers, history, round_number, &mut outcome);
        if let Some(odd) = rest.first() {
            log::warn!(
                "Stage {} round {}: {} left without an opponent",
                stage_id,
                round_number,
                odd.name
            );
            outcome.warnings.push(StageWarning::OddCompetitorCount {
                round: round_number,
                competitor: odd.id,
            });
        }
    }
    outcome
}

/// Group by exact record, best record first. Each group is ordered by
/// Buchholz (descending) then seed (ascending).
pub fn group_by_record<'a>(competitors: &[&'a Competitor]) -> BTreeMap<Record, Vec<&'a Competitor>> {
    let mut groups: BTreeMap<Record, Vec<&'a Competitor>> = BTreeMap::new();
    for &c in competitors {
        groups.entry(c.record()).or_default().push(c);
    }
    for members in groups.values_mut() {
        members.sort_by_key(|c| (Reverse(c.buchholz), c.seed, c.id));
    }
    groups
}

/// Score `pool[candidate]` as an opponent for `anchor`, where `pool` is everyone
/// still unpaired except the anchor.
pub fn score_candidate(
    anchor: &Competitor,
    candidate: usize,
    pool: &[&Competitor],
    history: &PairingHistory,
) -> CandidateScore {
    let is_rematch = history.have_met(anchor, pool[candidate]);
    let forces_rematch = !is_rematch && {
        let left: Vec<&Competitor> = pool
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != candidate)
            .map(|(_, &c)| c)
            .collect();
        left.len() == 2 && history.have_met(left[0], left[1])
    };
    CandidateScore {
        is_rematch,
        forces_rematch,
        position: Reverse(candidate),
    }
}

/// Pair the pool in order: each anchor (best remaining) takes its best-scored
/// candidate. Returns whoever could not be paired (at most one).
fn pair_pool<'a>(
    mut pool: Vec<&'a Competitor>,
    history: &PairingHistory,
    round_number: u32,
    outcome: &mut PairingOutcome,
) -> Vec<&'a Competitor> {
    while pool.len() >= 2 {
        let anchor = pool.remove(0);
        let best = (0..pool.len())
            .map(|i| (i, score_candidate(anchor, i, &pool, history)))
            .min_by_key(|(_, score)| *score);
        let Some((idx, score)) = best else {
            pool.insert(0, anchor);
            break;
        };
        let opponent = pool.remove(idx);

        if score.is_rematch {
            log::warn!(
                "Round {}: {} and {} have met already, forced rematch",
                round_number,
                anchor.name,
                opponent.name
            );
            outcome.warnings.push(StageWarning::ForcedRematch {
                round: round_number,
                pair: PairKey::new(anchor.id, opponent.id),
            });
        } else if score.forces_rematch {
            log::debug!(
                "Round {}: {} takes {} although the last two must replay",
                round_number,
                anchor.name,
                opponent.name
            );
        }
        log::debug!(
            "Round {}: {} ({}) vs {} ({})",
            round_number,
            anchor.name,
            anchor.record(),
            opponent.name,
            opponent.record()
        );
        outcome
            .matches
            .push(GameMatch::new(anchor.id, opponent.id, format_for(anchor, opponent)));
    }
    pool
}

/// Long format when either side can qualify or be eliminated by the result.
pub fn format_for(a: &Competitor, b: &Competitor) -> MatchFormat {
    if a.record().is_decisive() || b.record().is_decisive() {
        MatchFormat::BestOfThree
    } else {
        MatchFormat::BestOfOne
    }
}
