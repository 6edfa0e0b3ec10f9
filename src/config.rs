//! Tournament layout: which stages exist, their format and where promoted seeds start.

use crate::models::{Stage, StageKind, Tournament, TournamentError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

/// One stage of the layout.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    pub id: String,
    pub name: String,
    pub kind: StageKind,
    /// First seed handed to competitors promoted into this stage.
    #[serde(default = "default_starting_seed")]
    pub starting_seed: u32,
}

fn default_starting_seed() -> u32 {
    1
}

/// Stages in processing order. Qualifiers of stage N feed stage N+1.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub name: String,
    pub stages: Vec<StageConfig>,
}

impl StageConfig {
    pub fn new(id: &str, name: &str, kind: StageKind, starting_seed: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            starting_seed,
        }
    }
}

impl TournamentConfig {
    /// Three Swiss stages and an 8-team playoff. Stage 2 and 3 originals hold the top
    /// seeds, so promoted competitors are seeded after them.
    pub fn major(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: vec![
                StageConfig::new("stage-1", "Opening Stage", StageKind::Swiss, 1),
                StageConfig::new("stage-2", "Elimination Stage", StageKind::Swiss, 17),
                StageConfig::new("stage-3", "Decider Stage", StageKind::Swiss, 9),
                StageConfig::new("playoffs", "Playoffs", StageKind::Playoff, 1),
            ],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, TournamentError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TournamentError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, TournamentError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            TournamentError::InvalidConfig(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.stages.is_empty() {
            return Err(TournamentError::InvalidConfig(
                "at least one stage is required".to_string(),
            ));
        }
        let mut ids = HashSet::new();
        for (idx, stage) in self.stages.iter().enumerate() {
            if stage.id.trim().is_empty() {
                return Err(TournamentError::InvalidConfig(format!(
                    "stage {} has an empty id",
                    idx + 1
                )));
            }
            if !ids.insert(stage.id.as_str()) {
                return Err(TournamentError::InvalidConfig(format!(
                    "duplicate stage id {}",
                    stage.id
                )));
            }
            if stage.starting_seed == 0 {
                return Err(TournamentError::InvalidConfig(format!(
                    "stage {}: starting_seed must be at least 1",
                    stage.id
                )));
            }
            if stage.kind == StageKind::Playoff && idx + 1 != self.stages.len() {
                return Err(TournamentError::InvalidConfig(format!(
                    "stage {}: only the last stage can be a playoff",
                    stage.id
                )));
            }
        }
        Ok(())
    }

    /// A tournament with one empty stage per entry. Rosters come from an import.
    pub fn build(&self) -> Result<Tournament, TournamentError> {
        self.validate()?;
        let stages = self
            .stages
            .iter()
            .map(|s| Stage::new(&s.id, &s.name, s.kind).with_starting_seed(s.starting_seed))
            .collect();
        Ok(Tournament::with_stages(&self.name, stages))
    }
}

/// Path from an environment variable. Trimmed; empty counts as unset.
pub fn env_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}
