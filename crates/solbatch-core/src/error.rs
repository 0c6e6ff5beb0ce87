/// Failures raised by the JSON-RPC transport layer.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC endpoint returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("RPC server error {code}: {message}")]
    ServerError { code: i64, message: String },

    #[error("invalid RPC response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("RPC communication failure: {0}")]
    Rpc(#[from] RpcError),

    #[error("batch input/output mismatch: sent {expected} requests, received {actual} responses")]
    CountMismatch { expected: usize, actual: usize },

    #[error("failed to decode {method} response id={id}: {message}")]
    Decode {
        method: &'static str,
        id: u64,
        message: String,
    },

    #[error("batch response id={id} does not match any of the {batch_size} requests sent")]
    UnknownCorrelationId { id: u64, batch_size: usize },

    #[error("batch response id={id} was returned more than once")]
    DuplicateCorrelationId { id: u64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
