use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{CoreError, RpcError};

use super::{BatchCall, BatchReply, BatchTransport};

/// How the mock orders the replies it hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOrder {
    AsSent,
    Reversed,
    /// Deterministic interleave: odd positions first, then even ones.
    Shuffled,
}

/// Canned outcome for a single call position.
#[derive(Debug, Clone)]
pub enum CannedReply {
    Result(serde_json::Value),
    Error { code: i64, message: String },
    /// The node silently drops this call from the batch.
    Missing,
}

/// A mock batch transport for testing. Replies are looked up by the
/// parameter the call was keyed on (its first param), so tests can describe
/// answers per key without caring about ids.
pub struct MockTransport {
    replies: HashMap<String, CannedReply>,
    default_reply: CannedReply,
    order: ReplyOrder,
    extra_replies: usize,
    fail_with: Option<String>,
    recorded: Mutex<Vec<Vec<BatchCall>>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            replies: HashMap::new(),
            default_reply: CannedReply::Result(serde_json::Value::Null),
            order: ReplyOrder::AsSent,
            extra_replies: 0,
            fail_with: None,
        }
    }

    /// Every batch sent through this transport, in send order.
    pub fn recorded_batches(&self) -> Vec<Vec<BatchCall>> {
        self.recorded.lock().expect("mock lock poisoned").clone()
    }
}

pub struct MockTransportBuilder {
    replies: HashMap<String, CannedReply>,
    default_reply: CannedReply,
    order: ReplyOrder,
    extra_replies: usize,
    fail_with: Option<String>,
}

impl MockTransportBuilder {
    pub fn with_result(mut self, key: impl std::fmt::Display, result: serde_json::Value) -> Self {
        self.replies.insert(key.to_string(), CannedReply::Result(result));
        self
    }

    pub fn with_error(mut self, key: impl std::fmt::Display, code: i64, message: &str) -> Self {
        self.replies.insert(
            key.to_string(),
            CannedReply::Error {
                code,
                message: message.to_owned(),
            },
        );
        self
    }

    pub fn with_missing(mut self, key: impl std::fmt::Display) -> Self {
        self.replies.insert(key.to_string(), CannedReply::Missing);
        self
    }

    pub fn with_default_reply(mut self, reply: CannedReply) -> Self {
        self.default_reply = reply;
        self
    }

    pub fn with_order(mut self, order: ReplyOrder) -> Self {
        self.order = order;
        self
    }

    /// Append `count` duplicates of the first reply, as a misbehaving proxy might.
    pub fn with_extra_replies(mut self, count: usize) -> Self {
        self.extra_replies = count;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_owned());
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            replies: self.replies,
            default_reply: self.default_reply,
            order: self.order,
            extra_replies: self.extra_replies,
            fail_with: self.fail_with,
            recorded: Mutex::new(Vec::new()),
        }
    }
}

fn make_reply(id: u64, canned: &CannedReply) -> Option<BatchReply> {
    let outcome = match canned {
        CannedReply::Result(value) => Ok(value.clone()),
        CannedReply::Error { code, message } => Err(RpcError::ServerError {
            code: *code,
            message: message.clone(),
        }),
        CannedReply::Missing => return None,
    };
    Some(BatchReply { id, outcome })
}

#[async_trait]
impl BatchTransport for MockTransport {
    async fn call_batch(&self, calls: &[BatchCall]) -> Result<Vec<BatchReply>, CoreError> {
        self.recorded
            .lock()
            .expect("mock lock poisoned")
            .push(calls.to_vec());

        if let Some(message) = &self.fail_with {
            return Err(RpcError::InvalidResponse(message.clone()).into());
        }

        let mut replies: Vec<BatchReply> = calls
            .iter()
            .filter_map(|call| {
                let canned = call
                    .params
                    .first()
                    .and_then(serde_json::Value::as_str)
                    .and_then(|key| self.replies.get(key))
                    .unwrap_or(&self.default_reply);
                make_reply(call.id, canned)
            })
            .collect();

        if let Some(first) = calls.first() {
            for _ in 0..self.extra_replies {
                replies.push(BatchReply {
                    id: first.id,
                    outcome: Ok(serde_json::Value::Null),
                });
            }
        }

        match self.order {
            ReplyOrder::AsSent => {}
            ReplyOrder::Reversed => replies.reverse(),
            ReplyOrder::Shuffled => {
                let (odd, even): (Vec<_>, Vec<_>) = replies
                    .into_iter()
                    .enumerate()
                    .partition(|(pos, _)| pos % 2 == 1);
                replies = odd
                    .into_iter()
                    .chain(even)
                    .map(|(_, reply)| reply)
                    .collect();
            }
        }

        Ok(replies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(id: u64, key: &str) -> BatchCall {
        BatchCall {
            method: "getTransaction",
            id,
            params: vec![serde_json::json!(key)],
        }
    }

    #[tokio::test]
    async fn replies_follow_canned_outcomes() {
        let mock = MockTransport::builder()
            .with_result("a", serde_json::json!(1))
            .with_error("b", -32009, "missing")
            .with_missing("c")
            .build();

        let replies = mock
            .call_batch(&[call(0, "a"), call(1, "b"), call(2, "c")])
            .await
            .expect("mock batch must succeed");

        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].id, 0);
        assert_eq!(
            replies[0].outcome.as_ref().expect("a must succeed"),
            &serde_json::json!(1)
        );
        assert!(matches!(
            replies[1].outcome,
            Err(RpcError::ServerError { code: -32009, .. })
        ));
        assert_eq!(mock.recorded_batches().len(), 1);
    }

    #[tokio::test]
    async fn shuffled_order_moves_odd_positions_first() {
        let mock = MockTransport::builder()
            .with_order(ReplyOrder::Shuffled)
            .build();
        let calls: Vec<_> = (0..5).map(|i| call(i, &i.to_string())).collect();

        let replies = mock.call_batch(&calls).await.expect("mock batch must succeed");
        let ids: Vec<u64> = replies.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3, 0, 2, 4]);
    }
}
