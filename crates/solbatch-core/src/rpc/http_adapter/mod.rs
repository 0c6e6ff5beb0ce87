//! Native JSON-RPC batch transport for Solana compatible endpoints.
//!
//! Implements [`BatchTransport`](super::BatchTransport) over HTTP(S) using
//! `reqwest`: one POST per batch, with replies decoded into per-call
//! outcomes tagged by their echoed id.

mod client;
mod connection;
mod protocol;

pub use client::HttpTransport;
