//! Error types for the multicall pipeline.

use thiserror::Error;

use crate::network::{AggregatorVersion, Network};
use crate::request::JsonRpcError;

/// Errors raised while encoding arguments or decoding return data against an ABI.
#[derive(Debug, Error)]
pub enum AbiError {
    #[error("Function '{name}' not found in ABI")]
    FunctionNotFound { name: String },

    #[error("Argument count mismatch: ABI has {expected}, got {got}")]
    ArgumentCount { expected: usize, got: usize },

    #[error("Invalid argument '{param}': {reason}")]
    InvalidArgument { param: String, reason: String },

    #[error("Invalid ABI: {reason}")]
    InvalidAbi { reason: String },

    #[error("ABI decode failed: {reason}")]
    DecodeFailed { reason: String },

    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Output count mismatch: expected {expected}, got {got}")]
    OutputCount { expected: usize, got: usize },
}

/// Errors that can occur during an RPC transport operation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, status code, etc.).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON-RPC protocol-level error returned by the node, e.g. `execution reverted`.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The node answered, but not with what the caller expected.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Response could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl TransportError {
    /// Returns `true` if this is a node-side execution error (a revert).
    pub fn is_execution_error(&self) -> bool {
        matches!(self, Self::Rpc(_))
    }
}

/// Errors surfaced by one batch operation. Each pipeline stage fails fast.
#[derive(Debug, Error)]
pub enum MulticallError {
    /// A call's arguments do not match its method signature. Raised before any
    /// network interaction.
    #[error("Encoding call #{index} ({method}) failed: {source}")]
    Encoding {
        index: usize,
        method: String,
        #[source]
        source: AbiError,
    },

    /// The aggregator call itself failed; no results are available.
    #[error("{strategy} failed: {source}")]
    Aggregation {
        strategy: &'static str,
        #[source]
        source: TransportError,
    },

    /// A returned payload could not be unpacked into its output holder.
    #[error("Decoding result #{index} ({method}) failed: {source}")]
    Decoding {
        index: usize,
        method: String,
        #[source]
        source: AbiError,
    },

    #[error("No {version} aggregator registered for {network}")]
    UnknownDeployment {
        network: Network,
        version: AggregatorVersion,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl MulticallError {
    /// Index of the call the error refers to, if it is tied to a single call.
    pub fn call_index(&self) -> Option<usize> {
        match self {
            Self::Encoding { index, .. } | Self::Decoding { index, .. } => Some(*index),
            _ => None,
        }
    }
}
