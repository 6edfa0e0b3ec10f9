//! Swiss stage + playoff bracket engine: pairings, Buchholz, round orchestration,
//! promotion between stages and bracket propagation.
//!
//! The engine is pure: it takes a tournament snapshot plus known results and
//! returns the fully resolved snapshot. Undecided matches are predicted by seed.

pub mod config;
pub mod import;
pub mod logic;
pub mod models;
pub mod store;

pub use config::{StageConfig, TournamentConfig};
pub use logic::{
    advance, build_bracket, compute_buchholz, compute_qualified, compute_records, pair_next_round,
    promote, propagate, propagate_bracket, redecide, standings, submit_result, PropagationReport,
    StageSummary,
};
pub use models::{
    Competitor, CompetitorId, CompetitorStanding, GameMatch, KnownResult, KnownResults,
    MatchFormat, MatchId, PairKey, Record, ResultsByStage, Round, RoundStatus, Slot, Stage,
    StageKind, StageProgress, StageWarning, Tournament, TournamentError, TournamentId,
    WinnerSource,
};
pub use store::{TournamentStore, INACTIVITY_TIMEOUT};
