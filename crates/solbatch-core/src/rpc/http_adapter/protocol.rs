use crate::error::{CoreError, RpcError};

#[derive(serde::Serialize)]
pub(super) struct JsonRpcRequest<'a> {
    pub(super) jsonrpc: &'static str,
    pub(super) id: u64,
    pub(super) method: &'a str,
    pub(super) params: &'a [serde_json::Value],
}

#[derive(serde::Deserialize)]
pub(super) struct JsonRpcResponse {
    #[serde(default)]
    pub(super) id: serde_json::Value,
    pub(super) result: Option<serde_json::Value>,
    pub(super) error: Option<serde_json::Value>,
}

/// Batch bodies are normally arrays, but nodes answer a rejected batch
/// (malformed, too large, rate limited) with a single error object.
#[derive(serde::Deserialize)]
#[serde(untagged)]
pub(super) enum JsonRpcBatchBody {
    Batch(Vec<JsonRpcResponse>),
    Single(JsonRpcResponse),
}

/// Parse a JSON-RPC error value into a structured `RpcError`.
///
/// The JSON-RPC spec defines errors as `{"code": <int>, "message": <string>}`.
/// If the error value matches that shape, we produce a `ServerError`;
/// otherwise we fall back to `InvalidResponse` with the raw JSON.
pub(super) fn parse_jsonrpc_error(err: serde_json::Value) -> RpcError {
    #[derive(serde::Deserialize)]
    struct JsonRpcError {
        code: i64,
        message: String,
    }

    match serde_json::from_value::<JsonRpcError>(err.clone()) {
        Ok(parsed) => RpcError::ServerError {
            code: parsed.code,
            message: parsed.message,
        },
        Err(_) => RpcError::InvalidResponse(format!("non-standard JSON-RPC error: {err}")),
    }
}

/// Recover the correlation id a node echoed back. Some RPC proxies rewrite
/// numeric ids as strings, so both forms are accepted.
pub(super) fn parse_batch_id(id: &serde_json::Value) -> Result<u64, CoreError> {
    match id {
        serde_json::Value::Number(n) => n.as_u64().ok_or_else(|| {
            RpcError::InvalidResponse(format!("reply id {n} is not a batch position")).into()
        }),
        serde_json::Value::String(s) => s.trim().parse::<u64>().map_err(|e| {
            RpcError::InvalidResponse(format!("reply id `{s}` is not a batch position: {e}"))
                .into()
        }),
        serde_json::Value::Null => Err(RpcError::InvalidResponse(
            "reply has no id; the node could not attribute it to a call".to_owned(),
        )
        .into()),
        other => Err(RpcError::InvalidResponse(format!("unsupported reply id: {other}")).into()),
    }
}
