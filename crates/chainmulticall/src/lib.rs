//! # chainmulticall
//!
//! Batch many EVM contract reads into one `eth_call` through an on-chain
//! aggregator (Multicall v1/v2/v3).
//!
//! ```ignore
//! let config = MulticallConfig::from_yaml_str(yaml)?;
//! init_tracing(&config.log);
//! let multicall = connect(&config)?;
//!
//! let erc20 = ContractInterface::from_abi_json(ERC20_ABI)?;
//! let (mut a, mut b) = (0u128, 0u128);
//! let outcome = Calls::new(vec![
//!     Call::new(token, &erc20, "balanceOf", &mut a).arg(alice),
//!     Call::new(token, &erc20, "balanceOf", &mut b).arg(bob),
//! ])
//! .execute(&multicall.tolerant(false))
//! .await?;
//! ```

pub mod client;
pub mod config;
pub mod tracing_setup;

pub use client::{connect, connect_with};
pub use config::{ConfigError, MulticallConfig};
pub use tracing_setup::{init_tracing, LogConfig};

pub use chainmulticall_core::{
    aggregator_address, AbiError, AggregationResult, AggregatorVersion, BatchOutcome, BlockTag,
    CallOptions, CallResult, EncodedCall, MulticallError, Network, NormalizedValue, ReturnSlot,
    RpcTransport, TransportError,
};
pub use chainmulticall_evm::{
    Aggregate, Aggregator, Call, Calls, ContractInterface, MulticallContract, TryAggregate,
};
pub use chainmulticall_http::{HttpClientConfig, HttpRpcClient};
