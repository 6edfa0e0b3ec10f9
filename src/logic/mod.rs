//! Engine logic: records, pairing, round orchestration, bracket, promotion, propagation.

mod bracket;
mod buchholz;
mod pairing;
mod promotion;
mod propagation;
mod records;
mod rounds;

pub use bracket::{build_bracket, propagate as propagate_bracket, redecide, BRACKET_SIZE};
pub use buchholz::{buchholz_scores, compute_buchholz};
pub use pairing::{
    format_for, group_by_record, pair_by_record, pair_first_round, pair_next_round,
    score_candidate, CandidateScore, PairingHistory, PairingOutcome,
};
pub use promotion::{
    compute_qualified, is_ready_to_promote, promote, reseed, standings, standings_order,
};
pub use propagation::{propagate, submit_result, PropagationReport, StageSummary};
pub use records::{
    apply_records, compute_records, competitors_as_of, records_before, RecordBook, Records,
};
pub use rounds::{advance, update_round_statuses};
