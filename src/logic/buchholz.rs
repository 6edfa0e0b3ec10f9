//! Buchholz tie-break: sum of the net differentials of every opponent faced.

use super::records::Records;
use crate::models::CompetitorId;
use std::collections::HashMap;

/// Buchholz for one competitor against the given records.
///
/// Pass the records as of the round before the one being scored; opponents' results
/// from the current round must not count. Unknown competitors score 0.
pub fn compute_buchholz(competitor: CompetitorId, records: &Records) -> i32 {
    let Some(book) = records.get(&competitor) else {
        return 0;
    };
    book.opponents
        .iter()
        .filter_map(|opponent| records.get(opponent))
        .map(|opp| opp.record.diff())
        .sum()
}

/// Buchholz for every competitor in `records`.
pub fn buchholz_scores(records: &Records) -> HashMap<CompetitorId, i32> {
    records
        .keys()
        .map(|&id| (id, compute_buchholz(id, records)))
        .collect()
}
