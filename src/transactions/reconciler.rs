//! Snapshot diffing for polled transaction statuses

use crate::data_structures::Transaction;

/// Keep only the candidates whose observable state actually changed
///
/// For each candidate the prior record is looked up by identity
/// (hash, account); the candidate is a change iff its status or failure
/// reason differs from that record. Candidate order is preserved.
///
/// A transaction present in `previous` but absent from `candidates` (its
/// query failed this round) produces no entry, and neither does a candidate
/// with an identical status, so feeding the same candidates twice with no
/// intervening state update yields an empty second result. Candidates with
/// no prior record are ignored: the poller only ever reports transactions
/// it was handed, so an unknown identity has nothing to be compared against.
pub fn reconcile(previous: &[Transaction], candidates: Vec<Transaction>) -> Vec<Transaction> {
    candidates
        .into_iter()
        .filter(|candidate| {
            previous
                .iter()
                .find(|prior| prior.same_identity(candidate))
                .map(|prior| {
                    prior.status != candidate.status
                        || prior.failure_reason != candidate.failure_reason
                })
                .unwrap_or(false)
        })
        .collect()
}
