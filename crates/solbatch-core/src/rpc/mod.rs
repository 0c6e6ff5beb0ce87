//! Solana JSON-RPC batch transport layer.
//!
//! Defines the [`BatchTransport`] trait consumed by the correlator, the
//! per-call wire units ([`BatchCall`], [`BatchReply`]), and an HTTP JSON-RPC
//! implementation ([`HttpTransport`]) plus a test mock (`mock::MockTransport`).

mod http_adapter;
#[cfg(test)]
pub mod mock;

pub use http_adapter::HttpTransport;

use std::fmt::Display;
use std::hash::Hash;

use async_trait::async_trait;
use solana_pubkey::Pubkey;
use solana_signature::Signature;

use crate::error::{CoreError, RpcError};

/// One outbound call inside a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchCall {
    pub method: &'static str,
    /// Correlation id echoed back by the node in the matching reply.
    pub id: u64,
    pub params: Vec<serde_json::Value>,
}

/// One inbound reply inside a batch, tagged with the id of its call.
#[derive(Debug)]
pub struct BatchReply {
    pub id: u64,
    pub outcome: Result<serde_json::Value, RpcError>,
}

/// A transport able to send many JSON-RPC calls in one round trip.
///
/// Implementations must echo each call's `id` on its reply but are free to
/// return replies in any order, or to return fewer or more replies than
/// calls; the correlator checks for that itself.
#[async_trait]
pub trait BatchTransport: Send + Sync {
    async fn call_batch(&self, calls: &[BatchCall]) -> Result<Vec<BatchReply>, CoreError>;
}

/// A domain value that a batch is keyed by.
///
/// Solana RPC expects keys and signatures as base58 strings, which is what
/// their `Display` implementations produce.
pub trait BatchKey: Clone + Eq + Hash + Display + Send + Sync {
    fn to_param(&self) -> serde_json::Value {
        serde_json::Value::String(self.to_string())
    }
}

impl BatchKey for Pubkey {}

impl BatchKey for Signature {}
