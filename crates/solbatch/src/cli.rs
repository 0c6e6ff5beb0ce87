use clap::{Parser, Subcommand};

use solbatch_core::Commitment;

/// solbatch — batched Solana RPC lookups of signature histories and transactions.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Solana JSON-RPC URL (token-in-URL providers work as-is).
    #[arg(long, default_value = "http://127.0.0.1:8899", env = "SOLBATCH_RPC_URL")]
    pub rpc_url: String,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch recent signature history for each account in one batch.
    Signatures {
        /// Base58 account addresses.
        #[arg(required = true)]
        accounts: Vec<String>,
    },

    /// Fetch full transactions for each signature in one batch.
    Transactions {
        /// Base58 transaction signatures.
        #[arg(required = true)]
        signatures: Vec<String>,

        /// Use the legacy `getConfirmedTransaction` method.
        #[arg(long, conflicts_with = "commitment")]
        legacy: bool,

        /// Commitment level for `getTransaction`.
        #[arg(long, default_value = "confirmed")]
        commitment: Commitment,
    },
}
