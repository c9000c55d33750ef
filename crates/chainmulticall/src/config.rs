//! Client configuration, loadable from YAML or JSON.
//!
//! ```yaml
//! rpc_url: "https://eth.llamarpc.com"
//! network: eth-mainnet
//! version: v3
//! block: latest
//! log:
//!   level: info
//!   components:
//!     chainmulticall-evm: debug
//! ```

use std::path::Path;

use alloy_primitives::Address;
use chainmulticall_core::{
    call::{BlockTag, CallOptions},
    network::{AggregatorVersion, Network},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tracing_setup::LogConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Everything `connect` needs to build a multicall handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MulticallConfig {
    /// HTTP JSON-RPC endpoint
    pub rpc_url: String,
    /// Network used to look up the aggregator deployment
    pub network: Network,
    /// Aggregator generation to look up (default v2)
    #[serde(default)]
    pub version: AggregatorVersion,
    /// Use this aggregator instead of the registry entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregator_address: Option<Address>,
    /// Block the batch is evaluated at
    #[serde(default)]
    pub block: BlockTag,
    /// `from` of the `eth_call`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl MulticallConfig {
    /// Minimal config for `network` behind `rpc_url`; everything else defaulted.
    pub fn new(rpc_url: impl Into<String>, network: Network) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            network,
            version: AggregatorVersion::default(),
            aggregator_address: None,
            block: BlockTag::default(),
            from: None,
            request_timeout_ms: default_request_timeout_ms(),
            log: LogConfig::default(),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a file; `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_yaml_str(&text),
        }
    }

    /// Options every `eth_call` of the resulting handle carries.
    pub fn call_options(&self) -> CallOptions {
        CallOptions {
            block: self.block,
            from: self.from,
        }
    }
}
