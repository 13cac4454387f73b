//! Concurrent transaction status polling

use futures::future::join_all;
use tracing::debug;

use crate::data_structures::Transaction;
use crate::errors::ProviderError;
use crate::providers::ProviderRegistry;

/// Query the current status of every tracked transaction
///
/// All queries are issued concurrently; each is isolated, so one timing out
/// or failing cannot hold up or sink the others. The result carries only
/// the transactions whose query succeeded, in input order, each with its
/// freshly observed status and failure reason. Absence from the result
/// means "unchanged for now, retry next round", never a terminal failure.
///
/// Whether any returned status actually *changed* is not decided here;
/// that is [`reconcile`](super::reconcile)'s job.
pub async fn poll_transaction_statuses(
    transactions: &[Transaction],
    registry: &ProviderRegistry,
) -> Vec<Transaction> {
    let queries = transactions.iter().map(|transaction| async move {
        let provider = registry.provider_for(&transaction.account.network_id)?;
        let observed = provider.transaction_status(&transaction.hash).await?;
        Ok::<_, ProviderError>(Transaction {
            status: observed.tx_status,
            failure_reason: observed.tx_failure_reason,
            ..transaction.clone()
        })
    });

    join_all(queries)
        .await
        .into_iter()
        .zip(transactions)
        .filter_map(|(result, tracked)| match result {
            Ok(updated) => Some(updated),
            Err(error) => {
                debug!(hash = %tracked.hash, %error, "status query failed, retrying next round");
                None
            }
        })
        .collect()
}
