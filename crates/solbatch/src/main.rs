mod cli;

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use eyre::{eyre, WrapErr};
use serde::Serialize;
use solana_pubkey::Pubkey;
use solana_signature::Signature;

use solbatch_core::{BatchCorrelator, BatchRequester, CoreError, GetTransactionConfig};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let requester: Arc<dyn BatchRequester> = Arc::new(
        BatchCorrelator::connect(&args.rpc_url).context("configure Solana RPC transport")?,
    );

    let output = match args.command {
        cli::Command::Signatures { accounts } => {
            let accounts: Vec<Pubkey> = parse_all(&accounts, "account")?;
            let histories = requester
                .get_signatures_for_addresses(&accounts)
                .await
                .map_err(|err| rpc_failure(&args.rpc_url, err))?;
            tracing::info!(
                accounts = accounts.len(),
                entries = histories.values().map(Vec::len).sum::<usize>(),
                "fetched signature histories"
            );
            to_keyed_json(histories)?
        }
        cli::Command::Transactions {
            signatures,
            legacy,
            commitment,
        } => {
            let signatures: Vec<Signature> = parse_all(&signatures, "signature")?;
            let (output, resolved) = if legacy {
                let txs = requester
                    .get_transactions(&signatures)
                    .await
                    .map_err(|err| rpc_failure(&args.rpc_url, err))?;
                let resolved = txs.len();
                (to_keyed_json(txs)?, resolved)
            } else {
                let config = GetTransactionConfig { commitment };
                let txs = requester
                    .get_transactions_versioned(&signatures, &config)
                    .await
                    .map_err(|err| rpc_failure(&args.rpc_url, err))?;
                let resolved = txs.len();
                (to_keyed_json(txs)?, resolved)
            };
            if resolved < signatures.len() {
                tracing::warn!(
                    requested = signatures.len(),
                    resolved,
                    "some signatures were not found; the node may have pruned them"
                );
            }
            output
        }
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("serialize output")?;
    println!("{rendered}");

    Ok(())
}

fn parse_all<T>(raw: &[String], what: &str) -> eyre::Result<Vec<T>>
where
    T: FromStr,
    T::Err: Display,
{
    raw.iter()
        .map(|s| {
            s.parse::<T>()
                .map_err(|e| eyre!("invalid {what} `{s}`: {e}"))
        })
        .collect()
}

/// Re-key a result map by the base58 form of its keys, sorted for stable output.
fn to_keyed_json<K: Display, V: Serialize>(
    map: HashMap<K, V>,
) -> eyre::Result<serde_json::Value> {
    let keyed: BTreeMap<String, V> = map.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    serde_json::to_value(keyed).context("encode result map")
}

fn rpc_failure(rpc_url: &str, err: CoreError) -> eyre::Report {
    let message = format_rpc_error(rpc_url, &err);
    eyre!(message).wrap_err("batch request to Solana RPC failed")
}

fn format_rpc_error(rpc_url: &str, err: &CoreError) -> String {
    let source_error = err.to_string();
    let mut lines = vec![
        format!("endpoint: `{rpc_url}`"),
        format!("error: {source_error}"),
    ];

    if source_error.contains("dns error") {
        lines.push(
            "hint: hostname resolution failed; verify the endpoint hostname and your DNS/network"
                .into(),
        );
    } else if source_error.contains("HTTP 429") {
        lines.push(
            "hint: the provider is rate limiting; send smaller batches or use a dedicated endpoint"
                .into(),
        );
    } else if source_error.contains("HTTP 401") || source_error.contains("HTTP 403") {
        lines.push("hint: authentication failed; verify the token in the RPC URL".into());
    } else if source_error.contains("HTTP 413") {
        lines.push("hint: the batch is larger than the provider accepts".into());
    } else if matches!(
        err,
        CoreError::CountMismatch { .. } | CoreError::DuplicateCorrelationId { .. }
    ) {
        lines.push(
            "hint: a proxy between you and the node may be splitting or deduplicating batches"
                .into(),
        );
    } else if source_error.contains("error sending request for url") {
        lines.push("hint: request could not be sent; verify URL format, network access, and endpoint reachability".into());
    }

    lines.join("\n")
}
