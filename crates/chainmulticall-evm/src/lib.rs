//! # chainmulticall-evm
//!
//! Batch EVM contract reads through an on-chain aggregator contract.
//!
//! ## Pipeline
//! 1. [`Calls::encode`] turns each [`Call`] into an `(address, calldata)` pair
//!    using the call's own [`ContractInterface`].
//! 2. An [`Aggregator`] strategy, [`Aggregate`] (all-or-nothing) or
//!    [`TryAggregate`] (per-call success flags), submits the batch in a single
//!    `eth_call` to a [`MulticallContract`].
//! 3. Each returned payload is decoded with the originating call's interface
//!    and written into the call's output holder.
//!
//! ## Implementation notes
//! - Uses `alloy-core` dynamic ABI values; no generated bindings are required.
//! - Call data is `selector ++ abi_encode_params(args)`.

pub mod aggregator;
pub mod batch;
pub mod encoder;
pub mod interface;
pub mod normalizer;
pub mod unpack;

pub use aggregator::{Aggregate, Aggregator, MulticallContract, TryAggregate};
pub use batch::{Call, Calls};
pub use interface::ContractInterface;
