//! # chainmulticall-core
//!
//! Core types shared across all ChainMulticall crates.
//!
//! - [`Call`]-side data: [`EncodedCall`], [`AggregationResult`], [`CallOptions`]
//! - [`ReturnSlot`]: caller-owned storage a decoded result is written into
//! - [`network`]: static aggregator deployment tables
//! - [`RpcTransport`]: the async trait the aggregator handle talks through
//! - [`error`]: the error taxonomy for every pipeline stage
//!
//! [`Call`]: https://docs.rs/chainmulticall-evm/latest/chainmulticall_evm/batch/struct.Call.html

pub mod call;
pub mod error;
pub mod network;
pub mod request;
pub mod slot;
pub mod transport;
pub mod types;

pub use call::{AggregationResult, BatchOutcome, BlockTag, CallOptions, CallResult, EncodedCall};
pub use error::{AbiError, MulticallError, TransportError};
pub use network::{aggregator_address, AggregatorVersion, Network};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use slot::ReturnSlot;
pub use transport::RpcTransport;
pub use types::NormalizedValue;
