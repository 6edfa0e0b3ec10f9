//! Standings, qualification and promotion of qualifiers into the next stage.

use crate::models::{
    Competitor, CompetitorStanding, Stage, StageKind, StandingStatus, SWISS_THRESHOLD,
};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Standings order: wins desc, losses asc, Buchholz desc, seed asc. Ids break exact ties.
pub fn standings_order(a: &Competitor, b: &Competitor) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then(a.losses.cmp(&b.losses))
        .then(b.buchholz.cmp(&a.buchholz))
        .then(a.seed.cmp(&b.seed))
        .then(a.id.cmp(&b.id))
}

/// Standings for a stage, best first.
pub fn standings(stage: &Stage) -> Vec<CompetitorStanding> {
    let mut sorted: Vec<&Competitor> = stage.competitors.iter().collect();
    sorted.sort_by(|a, b| standings_order(a, b));
    let champion = stage.final_winner();
    sorted
        .into_iter()
        .map(|c| {
            let mut standing = c.standing();
            if stage.kind == StageKind::Playoff {
                standing.status = if champion == Some(c.id) {
                    StandingStatus::Qualified
                } else if c.losses > 0 {
                    StandingStatus::Eliminated
                } else {
                    StandingStatus::Alive
                };
            }
            standing
        })
        .collect()
}

/// Competitors that leave the stage upward, in standings order.
///
/// Swiss: everyone at the win threshold. Playoff: the final's winner.
pub fn compute_qualified(stage: &Stage) -> Vec<Competitor> {
    let mut qualified: Vec<Competitor> = match stage.kind {
        StageKind::Swiss => stage
            .competitors
            .iter()
            .filter(|c| c.wins >= SWISS_THRESHOLD)
            .cloned()
            .collect(),
        StageKind::Playoff => stage
            .final_winner()
            .and_then(|id| stage.competitor(id))
            .cloned()
            .into_iter()
            .collect(),
    };
    qualified.sort_by(standings_order);
    qualified
}

/// At least one competitor has finished the stage, so promotion has something to act on.
pub fn is_ready_to_promote(stage: &Stage) -> bool {
    match stage.kind {
        StageKind::Swiss => stage.competitors.iter().any(|c| c.record().is_finished()),
        StageKind::Playoff => stage.final_winner().is_some(),
    }
}

/// Order the qualifiers and hand out consecutive seeds from `starting_seed`.
/// Each copy keeps its previous seed as `original_seed` and starts from a blank record.
pub fn reseed(qualified: &[Competitor], starting_seed: u32) -> Vec<Competitor> {
    let mut sorted: Vec<&Competitor> = qualified.iter().collect();
    sorted.sort_by(|a, b| standings_order(a, b));
    sorted
        .into_iter()
        .zip(starting_seed..)
        .map(|(c, seed)| c.promoted(seed))
        .collect()
}

/// Replace the target's promoted competitors with the reseeded qualifiers.
///
/// Original competitors are never touched. A qualifier whose id is already an original
/// on the target is skipped. Returns the competitors actually added.
pub fn promote(qualified: &[Competitor], target: &mut Stage, starting_seed: u32) -> Vec<Competitor> {
    target.competitors.retain(|c| !c.is_promoted());
    let originals: HashSet<_> = target.competitors.iter().map(|c| c.id).collect();

    let mut added = Vec::new();
    for c in reseed(qualified, starting_seed) {
        if originals.contains(&c.id) {
            log::warn!(
                "Stage {}: {} is already on the roster, not promoting",
                target.id,
                c.name
            );
            continue;
        }
        log::debug!(
            "Stage {}: promoted {} as seed {} (was {})",
            target.id,
            c.name,
            c.seed,
            c.original_seed.unwrap_or_default()
        );
        target.competitors.push(c.clone());
        added.push(c);
    }
    added
}
