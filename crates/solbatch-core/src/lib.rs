pub mod correlator;
pub mod error;
pub mod rpc;
pub mod types;

pub use correlator::{BatchCorrelator, BatchRequester, DecodePolicy, SIGNATURE_HISTORY_LIMIT};
pub use error::{CoreError, RpcError};
pub use types::{
    Commitment, GetTransactionConfig, GetTransactionResult, SignatureInfo, TransactionWithMeta,
};
