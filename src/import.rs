//! CSV import of rosters and known results.
//!
//! Roster columns: `stage,id,name,seed` (blank `id` derives a stable one from the name).
//! Results columns: `stage,round,team_1,team_2,winner,score` (blank `round` applies to the
//! first meeting of the pair; `score` is carried into the match detail as-is).

use crate::models::{
    Competitor, CompetitorId, KnownResult, ResultsByStage, Tournament, TournamentError,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct RosterRow {
    stage: String,
    id: Option<Uuid>,
    name: String,
    seed: u32,
}

#[derive(Debug, Deserialize)]
struct ResultRow {
    stage: String,
    round: Option<u32>,
    team_1: Uuid,
    team_2: Uuid,
    winner: Uuid,
    score: Option<String>,
}

fn import_error(e: impl std::fmt::Display) -> TournamentError {
    TournamentError::Import(e.to_string())
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Id derived from a competitor's name, so re-importing a roster yields the same ids.
pub fn stable_id(name: &str) -> CompetitorId {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.trim().to_lowercase().as_bytes())
}

/// Add roster rows to their stages as original competitors. Returns the number added.
///
/// Rows for unknown stages fail the import; a repeated id within a stage is skipped.
pub fn read_roster<R: Read>(reader: R, tournament: &mut Tournament) -> Result<usize, TournamentError> {
    let mut rows = Vec::new();
    for row in csv_reader(reader).deserialize::<RosterRow>() {
        let row = row.map_err(import_error)?;
        if row.name.is_empty() {
            return Err(import_error("roster row with an empty name"));
        }
        tournament.stage_index(&row.stage)?;
        rows.push(row);
    }

    let mut added = 0;
    for row in rows {
        let stage = tournament.stage_mut(&row.stage)?;
        let id = row.id.unwrap_or_else(|| stable_id(&row.name));
        if stage.competitor(id).is_some() {
            log::warn!("Stage {}: {} is listed twice, keeping the first", stage.id, row.name);
            continue;
        }
        stage.competitors.push(Competitor::with_id(id, row.name, row.seed));
        added += 1;
    }
    log::info!("Imported {} competitor(s)", added);
    Ok(added)
}

/// Known results grouped by stage id.
pub fn read_results<R: Read>(reader: R) -> Result<ResultsByStage, TournamentError> {
    let mut results = ResultsByStage::new();
    let mut seen = HashSet::new();
    for row in csv_reader(reader).deserialize::<ResultRow>() {
        let row = row.map_err(import_error)?;
        if row.team_1 == row.team_2 {
            return Err(import_error(format!("{} cannot play itself", row.team_1)));
        }
        if row.winner != row.team_1 && row.winner != row.team_2 {
            return Err(import_error(format!(
                "winner {} is neither {} nor {}",
                row.winner, row.team_1, row.team_2
            )));
        }
        let mut result = KnownResult::new(row.team_1, row.team_2, row.winner);
        if let Some(round) = row.round {
            result = result.in_round(round);
        }
        if let Some(score) = row.score.filter(|s| !s.is_empty()) {
            result = result.with_detail(serde_json::json!({ "score": score }));
        }
        if !seen.insert((row.stage.clone(), result.pair, result.round)) {
            log::warn!("Stage {}: duplicate result for a pair, the later row wins", row.stage);
        }
        results.entry(row.stage).or_default().insert(result);
    }
    Ok(results)
}

pub fn load_roster(path: &Path, tournament: &mut Tournament) -> Result<usize, TournamentError> {
    let file = std::fs::File::open(path)
        .map_err(|e| import_error(format!("{}: {}", path.display(), e)))?;
    read_roster(file, tournament)
}

pub fn load_results(path: &Path) -> Result<ResultsByStage, TournamentError> {
    let file = std::fs::File::open(path)
        .map_err(|e| import_error(format!("{}: {}", path.display(), e)))?;
    read_results(file)
}
