//! Data structures for the engine: competitors, matches, rounds, stages, tournament.

mod competitor;
mod game;
mod record;
mod result;
mod stage;
mod tournament;

pub use competitor::{Competitor, CompetitorId, CompetitorStanding, Provenance, StandingStatus};
pub use game::{GameMatch, MatchFormat, MatchId, PairKey, Slot, WinnerSource};
pub use record::{Record, SWISS_THRESHOLD};
pub use result::{KnownResult, KnownResults, ResultsByStage};
pub use stage::{Round, RoundStatus, Stage, StageKind, StageProgress, StageWarning};
pub use tournament::{Tournament, TournamentError, TournamentId};
