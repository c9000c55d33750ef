//! chainmulticall-http: HTTP JSON-RPC transport for the multicall handle.
//!
//! One `eth_call` per batch, POSTed as a single JSON-RPC request. Retries and
//! failover are left to the caller.

pub mod client;

pub use client::{HttpClientConfig, HttpRpcClient};
