//! Batch correlation: one JSON-RPC call per key, one round trip per batch,
//! replies folded back into a map keyed by the caller's own values.
//!
//! Each call's id is the key's position in the input slice. Replies are
//! matched purely by that echoed id, never by their position in the reply
//! array, since nodes and proxies are free to reorder batch members.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::rpc::{BatchCall, BatchKey, BatchReply, BatchTransport, HttpTransport};
use crate::types::{
    Commitment, GetTransactionConfig, GetTransactionResult, SignatureInfo, TransactionWithMeta,
};

/// Maximum number of history entries requested per account.
pub const SIGNATURE_HISTORY_LIMIT: usize = 15;

// ==============================================================================
// Per-Operation Policy
// ==============================================================================

/// What to do when a single reply cannot be decoded into the expected payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Abort the whole batch with [`CoreError::Decode`].
    Escalate,
    /// Leave the key out of the result and keep going.
    Skip,
}

/// Static description of one batched RPC method.
#[derive(Debug, Clone, Copy)]
struct BatchOperation {
    method: &'static str,
    policy: DecodePolicy,
    /// Reject the batch unless exactly one reply came back per call.
    require_full_count: bool,
}

// An account always has a (possibly empty) history, so an undecodable reply
// means the node broke the contract rather than that the item is missing.
const SIGNATURES_FOR_ADDRESS: BatchOperation = BatchOperation {
    method: "getSignaturesForAddress",
    policy: DecodePolicy::Escalate,
    require_full_count: false,
};

// Pruned or unknown signatures come back as `null`.
const CONFIRMED_TRANSACTION: BatchOperation = BatchOperation {
    method: "getConfirmedTransaction",
    policy: DecodePolicy::Skip,
    require_full_count: true,
};

const TRANSACTION: BatchOperation = BatchOperation {
    method: "getTransaction",
    policy: DecodePolicy::Skip,
    require_full_count: true,
};

// ==============================================================================
// Public Surface
// ==============================================================================

/// Batched lookups against a Solana RPC node.
///
/// Every method issues exactly one batch round trip (none for empty input)
/// and returns a map keyed by the inputs. Duplicate inputs collapse to one
/// map entry.
#[async_trait]
pub trait BatchRequester: Send + Sync {
    /// Recent signature history (newest first, up to
    /// [`SIGNATURE_HISTORY_LIMIT`] entries) for each account, at `confirmed`
    /// commitment. Any undecodable reply fails the whole call, including a
    /// `null` result or a per-item RPC error: neither is read as an empty
    /// history.
    async fn get_signatures_for_addresses(
        &self,
        accounts: &[Pubkey],
    ) -> Result<HashMap<Pubkey, Vec<SignatureInfo>>, CoreError>;

    /// Transactions via the legacy `getConfirmedTransaction` method at
    /// `confirmed` commitment. Signatures the node cannot resolve are
    /// omitted from the result.
    async fn get_transactions(
        &self,
        signatures: &[Signature],
    ) -> Result<HashMap<Signature, TransactionWithMeta>, CoreError>;

    /// Transactions via `getTransaction` at the configured commitment.
    /// Signatures the node cannot resolve are omitted from the result.
    async fn get_transactions_versioned(
        &self,
        signatures: &[Signature],
        config: &GetTransactionConfig,
    ) -> Result<HashMap<Signature, GetTransactionResult>, CoreError>;
}

/// Builds, sends and correlates batches over any [`BatchTransport`].
pub struct BatchCorrelator<T> {
    transport: T,
}

impl BatchCorrelator<HttpTransport> {
    /// Correlator speaking JSON-RPC over HTTP(S) to `endpoint`.
    pub fn connect(endpoint: &str) -> Result<Self, CoreError> {
        Ok(Self::new(HttpTransport::new(endpoint)?))
    }
}

impl<T: BatchTransport> BatchCorrelator<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    async fn run<K, P>(
        &self,
        operation: BatchOperation,
        keys: &[K],
        options: serde_json::Value,
    ) -> Result<HashMap<K, P>, CoreError>
    where
        K: BatchKey,
        P: DeserializeOwned,
    {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let calls = build_calls(operation.method, keys, &options);
        let replies = self.transport.call_batch(&calls).await?;
        debug!(
            rpc.method = operation.method,
            requests = calls.len(),
            replies = replies.len(),
            "batch round trip complete"
        );

        if operation.require_full_count {
            if replies.len() != calls.len() {
                return Err(CoreError::CountMismatch {
                    expected: calls.len(),
                    actual: replies.len(),
                });
            }
            // Equal counts still hide a dropped reply if another was duplicated.
            check_unique_ids(&replies, keys.len())?;
        }

        correlate(operation.method, keys, replies, operation.policy)
    }
}

#[async_trait]
impl<T: BatchTransport> BatchRequester for BatchCorrelator<T> {
    async fn get_signatures_for_addresses(
        &self,
        accounts: &[Pubkey],
    ) -> Result<HashMap<Pubkey, Vec<SignatureInfo>>, CoreError> {
        let options = serde_json::json!({
            "commitment": Commitment::Confirmed,
            "limit": SIGNATURE_HISTORY_LIMIT,
        });
        self.run(SIGNATURES_FOR_ADDRESS, accounts, options).await
    }

    async fn get_transactions(
        &self,
        signatures: &[Signature],
    ) -> Result<HashMap<Signature, TransactionWithMeta>, CoreError> {
        let options = serde_json::json!({ "commitment": Commitment::Confirmed });
        self.run(CONFIRMED_TRANSACTION, signatures, options).await
    }

    async fn get_transactions_versioned(
        &self,
        signatures: &[Signature],
        config: &GetTransactionConfig,
    ) -> Result<HashMap<Signature, GetTransactionResult>, CoreError> {
        let options = serde_json::json!({ "commitment": config.commitment });
        self.run(TRANSACTION, signatures, options).await
    }
}

// ==============================================================================
// Build / Fold
// ==============================================================================

/// One call per key, `id` = position in `keys`.
pub(crate) fn build_calls<K: BatchKey>(
    method: &'static str,
    keys: &[K],
    options: &serde_json::Value,
) -> Vec<BatchCall> {
    keys.iter()
        .enumerate()
        .map(|(index, key)| BatchCall {
            method,
            id: index as u64,
            params: vec![key.to_param(), options.clone()],
        })
        .collect()
}

/// Reject a reply set in which any correlation id appears more than once.
fn check_unique_ids(replies: &[BatchReply], batch_size: usize) -> Result<(), CoreError> {
    let mut seen = vec![false; batch_size];
    for reply in replies {
        let index = usize::try_from(reply.id)
            .ok()
            .filter(|index| *index < batch_size)
            .ok_or(CoreError::UnknownCorrelationId {
                id: reply.id,
                batch_size,
            })?;
        if seen[index] {
            return Err(CoreError::DuplicateCorrelationId { id: reply.id });
        }
        seen[index] = true;
    }
    Ok(())
}

/// Fold replies into a key-indexed map, using each reply's id as an index
/// into `keys`.
///
/// An id outside `keys` is a protocol violation and fails regardless of
/// `policy`. Per-item RPC errors are handled like decode failures.
pub(crate) fn correlate<K, P>(
    method: &'static str,
    keys: &[K],
    replies: Vec<BatchReply>,
    policy: DecodePolicy,
) -> Result<HashMap<K, P>, CoreError>
where
    K: BatchKey,
    P: DeserializeOwned,
{
    let mut out = HashMap::with_capacity(replies.len());
    let mut skipped = 0usize;

    for reply in replies {
        let key = usize::try_from(reply.id)
            .ok()
            .and_then(|index| keys.get(index))
            .ok_or(CoreError::UnknownCorrelationId {
                id: reply.id,
                batch_size: keys.len(),
            })?;

        let decoded = reply
            .outcome
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_value::<P>(raw).map_err(|e| e.to_string()));

        match (decoded, policy) {
            (Ok(payload), _) => {
                out.insert(key.clone(), payload);
            }
            (Err(message), DecodePolicy::Escalate) => {
                return Err(CoreError::Decode {
                    method,
                    id: reply.id,
                    message,
                });
            }
            (Err(message), DecodePolicy::Skip) => {
                debug!(
                    rpc.method = method,
                    rpc.id = reply.id,
                    %key,
                    %message,
                    "skipping unresolved batch item"
                );
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(
            rpc.method = method,
            skipped,
            resolved = out.len(),
            "some batch items could not be resolved"
        );
    }

    Ok(out)
}
