//! Build a ready-to-use [`MulticallContract`] from a [`MulticallConfig`].

use std::sync::Arc;
use std::time::Duration;

use chainmulticall_core::{error::MulticallError, transport::RpcTransport};
use chainmulticall_evm::MulticallContract;
use chainmulticall_http::{HttpClientConfig, HttpRpcClient};

use crate::config::MulticallConfig;

/// Connect to `config.rpc_url` over HTTP and resolve the aggregator.
///
/// No request is made here; the first network call happens on the first
/// batch.
pub fn connect(config: &MulticallConfig) -> Result<MulticallContract, MulticallError> {
    let http = HttpRpcClient::new(
        config.rpc_url.as_str(),
        HttpClientConfig {
            request_timeout: Duration::from_millis(config.request_timeout_ms),
        },
    )?;
    connect_with(config, Arc::new(http))
}

/// Like [`connect`], over a caller-supplied transport.
pub fn connect_with(
    config: &MulticallConfig,
    transport: Arc<dyn RpcTransport>,
) -> Result<MulticallContract, MulticallError> {
    let contract = match config.aggregator_address {
        Some(address) => MulticallContract::new(address, transport),
        None => MulticallContract::for_network(transport, config.network, config.version)?,
    };

    tracing::debug!(
        url = %contract.transport().url(),
        network = %config.network,
        version = %config.version,
        aggregator = %contract.address(),
        block = %config.block,
        "multicall handle ready"
    );

    Ok(contract.with_options(config.call_options()))
}
