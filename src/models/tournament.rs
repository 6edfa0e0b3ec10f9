//! Tournament and TournamentError.

use crate::models::competitor::{Competitor, CompetitorId};
use crate::models::stage::{Stage, StageKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that abort an engine operation. The caller's snapshot is left unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Round index outside the stage's rounds (caller bug).
    StageIndex { stage: String, round: usize },
    /// Playoff stage is not 8 competitors over rounds of 4/2/1 matches.
    BracketShape { competitors: usize, rounds: usize },
    /// No stage with this id.
    UnknownStage(String),
    /// Competitor not on the stage's roster.
    CompetitorNotFound(CompetitorId),
    /// Winner is not one of the match's two competitors.
    InvalidWinner { winner: CompetitorId },
    /// No match for the given pair / position.
    MatchNotFound,
    /// Configuration rejected.
    InvalidConfig(String),
    /// Roster or results import failed.
    Import(String),
    /// A lock guarding a tournament snapshot was poisoned.
    LockPoisoned,
    TournamentNotFound(TournamentId),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::StageIndex { stage, round } => {
                write!(f, "Round index {} is out of range for stage {}", round, stage)
            }
            TournamentError::BracketShape { competitors, rounds } => write!(
                f,
                "Playoff bracket needs 8 competitors and 3 rounds (got {} competitors, {} rounds)",
                competitors, rounds
            ),
            TournamentError::UnknownStage(id) => write!(f, "Unknown stage {}", id),
            TournamentError::CompetitorNotFound(id) => write!(f, "Competitor {} not found", id),
            TournamentError::InvalidWinner { winner } => {
                write!(f, "Competitor {} is not part of this match", winner)
            }
            TournamentError::MatchNotFound => write!(f, "Match not found"),
            TournamentError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            TournamentError::Import(msg) => write!(f, "Import failed: {}", msg),
            TournamentError::LockPoisoned => write!(f, "Tournament lock poisoned"),
            TournamentError::TournamentNotFound(id) => write!(f, "Tournament {} not found", id),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// A tournament snapshot: stages in processing order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub stages: Vec<Stage>,
    /// Index of the stage shown by default.
    pub current_stage: usize,
    /// Time of the last successful propagation.
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            stages: Vec::new(),
            current_stage: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn with_stages(name: impl Into<String>, stages: Vec<Stage>) -> Self {
        Self {
            stages,
            ..Self::new(name)
        }
    }

    pub fn stage_index(&self, stage_id: &str) -> Result<usize, TournamentError> {
        self.stages
            .iter()
            .position(|s| s.id == stage_id)
            .ok_or_else(|| TournamentError::UnknownStage(stage_id.to_string()))
    }

    pub fn stage(&self, stage_id: &str) -> Result<&Stage, TournamentError> {
        let idx = self.stage_index(stage_id)?;
        Ok(&self.stages[idx])
    }

    pub fn stage_mut(&mut self, stage_id: &str) -> Result<&mut Stage, TournamentError> {
        let idx = self.stage_index(stage_id)?;
        Ok(&mut self.stages[idx])
    }

    pub fn current(&self) -> Option<&Stage> {
        self.stages.get(self.current_stage)
    }

    pub fn set_current_stage(&mut self, stage_id: &str) -> Result<(), TournamentError> {
        self.current_stage = self.stage_index(stage_id)?;
        Ok(())
    }

    /// Winner of the terminal playoff's final. None while undecided ("TBD").
    pub fn champion(&self) -> Option<&Competitor> {
        let last = self.stages.last()?;
        if last.kind != StageKind::Playoff {
            return None;
        }
        let id = last.final_winner()?;
        last.competitor(id)
    }
}
