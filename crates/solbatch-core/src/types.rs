//! Payload types decoded from Solana JSON-RPC responses.
//!
//! Only the fields callers actually use are modelled; everything else in the
//! node's response is ignored by `serde`. The encoded transaction body is kept
//! as raw JSON since its shape depends on the requested encoding.

use serde::{Deserialize, Serialize};

// ==============================================================================
// Commitment
// ==============================================================================

/// Commitment level the node should use when answering a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Commitment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processed" => Ok(Self::Processed),
            "confirmed" => Ok(Self::Confirmed),
            "finalized" => Ok(Self::Finalized),
            other => Err(format!(
                "unknown commitment `{other}`; expected processed, confirmed or finalized"
            )),
        }
    }
}

/// Options for `getTransaction` batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetTransactionConfig {
    pub commitment: Commitment,
}

// ==============================================================================
// Signature History
// ==============================================================================

/// One entry of a `getSignaturesForAddress` result, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: String,
    pub slot: u64,
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
}

// ==============================================================================
// Transactions
// ==============================================================================

/// Execution metadata attached to a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    pub fee: u64,
    #[serde(default)]
    pub pre_balances: Vec<u64>,
    #[serde(default)]
    pub post_balances: Vec<u64>,
    #[serde(default)]
    pub log_messages: Option<Vec<String>>,
}

/// Legacy `getConfirmedTransaction` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionWithMeta {
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    pub transaction: serde_json::Value,
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
}

/// Transaction format version as reported by `getTransaction`:
/// either the string `"legacy"` or a numeric version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionVersion {
    Legacy(LegacyVersion),
    Number(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyVersion {
    Legacy,
}

/// Versioned `getTransaction` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionResult {
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    pub transaction: serde_json::Value,
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
    #[serde(default)]
    pub version: Option<TransactionVersion>,
}
