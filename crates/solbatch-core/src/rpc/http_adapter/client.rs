use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Url};
use tracing::{debug, trace};

use crate::error::{CoreError, RpcError};

use super::super::{BatchCall, BatchReply, BatchTransport};
use super::connection::parse_connection;
use super::protocol::{
    parse_batch_id, parse_jsonrpc_error, JsonRpcBatchBody, JsonRpcRequest, JsonRpcResponse,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Solana JSON-RPC batch transport over HTTP(S).
///
/// Sends every call of a batch as one JSON array in a single POST and hands
/// back the replies exactly as the node returned them. Reply ordering and
/// counts are left for the caller to validate.
pub struct HttpTransport {
    client: reqwest::Client,
    url: Url,
}

impl HttpTransport {
    /// Create a transport for an `http://` or `https://` endpoint.
    ///
    /// Providers that authenticate with a token in the URL path work as-is.
    pub fn new(connection: &str) -> Result<Self, CoreError> {
        let url = parse_connection(connection)?;

        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .tcp_nodelay(true)
            .build()
            .map_err(RpcError::Transport)?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl BatchTransport for HttpTransport {
    async fn call_batch(&self, calls: &[BatchCall]) -> Result<Vec<BatchReply>, CoreError> {
        debug!(
            rpc.batch_size = calls.len(),
            rpc.method = calls.first().map(|c| c.method).unwrap_or_default(),
            "rpc batch call"
        );
        let requests: Vec<JsonRpcRequest<'_>> = calls
            .iter()
            .map(|call| JsonRpcRequest {
                jsonrpc: "2.0",
                id: call.id,
                method: call.method,
                params: &call.params,
            })
            .collect();

        let response = self
            .client
            .post(self.url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .json(&requests)
            .send()
            .await
            .map_err(RpcError::Transport)?;
        let status = response.status();

        let body = response.text().await.map_err(RpcError::Transport)?;
        debug!(
            rpc.batch_size = calls.len(),
            %status,
            body_len = body.len(),
            "rpc batch response"
        );
        trace!(rpc.batch_size = calls.len(), body = %body, "rpc batch response body");

        if !status.is_success() {
            return Err(RpcError::HttpStatus {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let decoded: JsonRpcBatchBody = serde_json::from_str(&body).map_err(|e| {
            RpcError::InvalidResponse(format!("decode JSON-RPC batch response: {e}; body={body}"))
        })?;

        let items = match decoded {
            JsonRpcBatchBody::Batch(items) => items,
            JsonRpcBatchBody::Single(JsonRpcResponse {
                error: Some(err), ..
            }) => return Err(parse_jsonrpc_error(err).into()),
            JsonRpcBatchBody::Single(_) => {
                return Err(RpcError::InvalidResponse(format!(
                    "expected JSON-RPC batch array; body={body}"
                ))
                .into())
            }
        };

        items
            .into_iter()
            .map(|item| {
                let id = parse_batch_id(&item.id)?;
                let outcome = match item.error {
                    Some(err) => Err(parse_jsonrpc_error(err)),
                    None => Ok(item.result.unwrap_or(serde_json::Value::Null)),
                };
                Ok(BatchReply { id, outcome })
            })
            .collect()
    }
}
