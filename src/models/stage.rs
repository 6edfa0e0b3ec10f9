//! Stage, Round and their status/warning types.

use crate::models::competitor::{Competitor, CompetitorId};
use crate::models::game::{GameMatch, PairKey};
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};

/// Stage format.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageKind {
    Swiss,
    /// 8-team single elimination.
    Playoff,
}

impl StageKind {
    /// Fixed number of rounds for the format.
    pub fn round_ceiling(&self) -> usize {
        match self {
            StageKind::Swiss => 5,
            StageKind::Playoff => 3,
        }
    }
}

/// Round state. Exactly one round per stage is active at a time.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    #[default]
    Pending,
    Active,
    Completed,
}

/// Resolution state of a stage after the engine has run over it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageProgress {
    /// No matches generated yet.
    NotStarted,
    /// Matches remain to be decided or generated.
    InProgress,
    /// Every competitor has finished (Swiss) or the final is decided (playoff).
    Complete,
    /// Competitors remain but no further pairing is possible.
    Stalled,
}

/// Non-fatal conditions met while generating rounds. Processing continues with a fallback.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StageWarning {
    /// Fewer than two active competitors; the round is left empty.
    InsufficientCompetitors { round: u32, active: usize },
    /// One competitor left unpaired for the round.
    OddCompetitorCount { round: u32, competitor: CompetitorId },
    /// Pairing had to reuse an earlier pairing.
    ForcedRematch { round: u32, pair: PairKey },
}

/// One round of a stage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based, contiguous within the stage.
    pub number: u32,
    pub matches: Vec<GameMatch>,
    pub status: RoundStatus,
}

impl Round {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            matches: Vec::new(),
            status: RoundStatus::Pending,
        }
    }

    /// Has matches and every one has both competitors assigned.
    pub fn is_populated(&self) -> bool {
        !self.matches.is_empty() && self.matches.iter().all(GameMatch::is_populated)
    }

    /// Has matches and every one carries an authoritative result.
    pub fn is_reported(&self) -> bool {
        !self.matches.is_empty() && self.matches.iter().all(GameMatch::is_reported)
    }

    pub fn find_pair(&self, pair: PairKey) -> Option<usize> {
        self.matches.iter().position(|m| m.pair_key() == Some(pair))
    }
}

/// A stage: roster plus rounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Stable key (e.g. "stage-2"), used to look up known results.
    pub id: String,
    pub name: String,
    pub kind: StageKind,
    /// First seed handed to competitors promoted into this stage.
    pub starting_seed: u32,
    pub competitors: Vec<Competitor>,
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub warnings: Vec<StageWarning>,
}

impl Stage {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: StageKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            starting_seed: 1,
            competitors: Vec::new(),
            rounds: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_competitors(mut self, competitors: Vec<Competitor>) -> Self {
        self.competitors = competitors;
        self
    }

    pub fn with_starting_seed(mut self, seed: u32) -> Self {
        self.starting_seed = seed;
        self
    }

    pub fn round_ceiling(&self) -> usize {
        self.kind.round_ceiling()
    }

    pub fn competitor(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.id == id)
    }

    pub fn competitor_mut(&mut self, id: CompetitorId) -> Option<&mut Competitor> {
        self.competitors.iter_mut().find(|c| c.id == id)
    }

    pub fn round(&self, index: usize) -> Result<&Round, TournamentError> {
        self.rounds.get(index).ok_or(TournamentError::StageIndex {
            stage: self.id.clone(),
            round: index,
        })
    }

    pub fn round_mut(&mut self, index: usize) -> Result<&mut Round, TournamentError> {
        let stage = self.id.clone();
        self.rounds
            .get_mut(index)
            .ok_or(TournamentError::StageIndex { stage, round: index })
    }

    /// Competitors still in contention: not finished in a Swiss stage, no loss in a playoff.
    pub fn active_competitors(&self) -> Vec<&Competitor> {
        self.competitors
            .iter()
            .filter(|c| match self.kind {
                StageKind::Swiss => !c.record().is_finished(),
                StageKind::Playoff => c.losses == 0,
            })
            .collect()
    }

    /// Zero every competitor's record, opponents and Buchholz.
    pub fn reset_records(&mut self) {
        for c in &mut self.competitors {
            c.reset_record();
        }
    }

    /// Drop the matches of every round from `index` on, so they are regenerated.
    pub fn clear_rounds_from(&mut self, index: usize) {
        for round in self.rounds.iter_mut().skip(index) {
            round.matches.clear();
        }
    }

    /// Pad with empty rounds up to the ceiling and drop rounds beyond it.
    pub fn ensure_rounds(&mut self) {
        let ceiling = self.round_ceiling();
        self.rounds.truncate(ceiling);
        for (idx, round) in self.rounds.iter_mut().enumerate() {
            round.number = idx as u32 + 1;
        }
        while self.rounds.len() < ceiling {
            self.rounds.push(Round::new(self.rounds.len() as u32 + 1));
        }
    }

    /// Winner of the last match of the last round (the final, in a playoff).
    pub fn final_winner(&self) -> Option<CompetitorId> {
        self.rounds.last()?.matches.last()?.winner
    }

    pub fn progress(&self) -> StageProgress {
        let started = self.rounds.iter().any(|r| !r.matches.is_empty());
        if !started {
            return if self.competitors.len() < 2 {
                StageProgress::Stalled
            } else {
                StageProgress::NotStarted
            };
        }
        if self.kind == StageKind::Playoff {
            return if self.final_winner().is_some() {
                StageProgress::Complete
            } else {
                StageProgress::InProgress
            };
        }

        let undecided = self
            .rounds
            .iter()
            .flat_map(|r| &r.matches)
            .any(|m| !m.is_decided());
        if undecided {
            return StageProgress::InProgress;
        }
        if self.active_competitors().is_empty() {
            return StageProgress::Complete;
        }
        let starved = self
            .warnings
            .iter()
            .any(|w| matches!(w, StageWarning::InsufficientCompetitors { .. }));
        let exhausted = self.rounds.len() >= self.round_ceiling()
            && self.rounds.iter().all(|r| !r.matches.is_empty());
        if starved || exhausted {
            StageProgress::Stalled
        } else {
            StageProgress::InProgress
        }
    }
}
