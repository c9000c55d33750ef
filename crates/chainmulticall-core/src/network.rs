//! Aggregator deployments per network.
//!
//! The tables are process-wide constants. A network missing from a version's
//! table has no deployment for that version; lookups return `None` rather than
//! falling back to another network's address.
//!
//! See <https://github.com/makerdao/multicall> (V1, V2) and
//! <https://github.com/mds1/multicall> (V3).

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Networks with a known aggregator deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    EthMainnet,
    Kovan,
    Rinkeby,
    Goerli,
    Ropsten,
    XDai,
    Polygon,
    Mumbai,
    BscMainnet,
    BscTestnet,
}

impl Network {
    pub const ALL: [Network; 10] = [
        Network::EthMainnet,
        Network::Kovan,
        Network::Rinkeby,
        Network::Goerli,
        Network::Ropsten,
        Network::XDai,
        Network::Polygon,
        Network::Mumbai,
        Network::BscMainnet,
        Network::BscTestnet,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Network::EthMainnet => "eth-mainnet",
            Network::Kovan => "kovan",
            Network::Rinkeby => "rinkeby",
            Network::Goerli => "goerli",
            Network::Ropsten => "ropsten",
            Network::XDai => "x-dai",
            Network::Polygon => "polygon",
            Network::Mumbai => "mumbai",
            Network::BscMainnet => "bsc-mainnet",
            Network::BscTestnet => "bsc-testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.slug() == s)
            .ok_or_else(|| format!("unknown network '{s}'"))
    }
}

/// Aggregator contract generation.
///
/// `V1` only exposes `aggregate`; `V2` and `V3` also expose `tryAggregate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregatorVersion {
    V1,
    #[default]
    V2,
    V3,
}

impl AggregatorVersion {
    fn table(self) -> &'static [(Network, Address)] {
        match self {
            AggregatorVersion::V1 => V1,
            AggregatorVersion::V2 => V2,
            AggregatorVersion::V3 => V3,
        }
    }
}

impl fmt::Display for AggregatorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregatorVersion::V1 => write!(f, "v1"),
            AggregatorVersion::V2 => write!(f, "v2"),
            AggregatorVersion::V3 => write!(f, "v3"),
        }
    }
}

const V1: &[(Network, Address)] = &[
    (Network::EthMainnet, address!("eefba1e63905ef1d7acba5a8513c70307c1ce441")),
    (Network::Kovan, address!("2cc8688c5f75e365aaeeb4ea8d6a480405a48d2a")),
    (Network::Rinkeby, address!("42ad527de7d4e9d9d011ac45b31d8551f8fe9821")),
    (Network::Goerli, address!("77dca2c955b15e9de4dbbcf1246b4b85b651e50e")),
    (Network::Ropsten, address!("53c43764255c17bd724f74c4ef150724ac50a3ed")),
    (Network::XDai, address!("b5b692a88bdfc81ca69dcb1d924f59f0413a602a")),
    (Network::Polygon, address!("11ce4B23bD875D7F5C6a31084f55fDe1e9A87507")),
    (Network::Mumbai, address!("08411ADd0b5AA8ee47563b146743C13b3556c9Cc")),
];

const V2: &[(Network, Address)] = &[
    (Network::EthMainnet, address!("5ba1e12693dc8f9c48aad8770482f4739beed696")),
    (Network::Kovan, address!("5ba1e12693dc8f9c48aad8770482f4739beed696")),
    (Network::Rinkeby, address!("5ba1e12693dc8f9c48aad8770482f4739beed696")),
    (Network::Goerli, address!("5ba1e12693dc8f9c48aad8770482f4739beed696")),
    (Network::Ropsten, address!("5ba1e12693dc8f9c48aad8770482f4739beed696")),
    (Network::BscMainnet, address!("41263cba59eb80dc200f3e2544eda4ed6a90e76c")),
    (Network::BscTestnet, address!("ae11C5B5f29A6a25e955F0CB8ddCc416f522AF5C")),
];

// Multicall3 is deployed at the same address everywhere.
const MULTICALL3: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");

const V3: &[(Network, Address)] = &[
    (Network::EthMainnet, MULTICALL3),
    (Network::Kovan, MULTICALL3),
    (Network::Rinkeby, MULTICALL3),
    (Network::Goerli, MULTICALL3),
    (Network::Ropsten, MULTICALL3),
    (Network::XDai, MULTICALL3),
    (Network::Polygon, MULTICALL3),
    (Network::Mumbai, MULTICALL3),
    (Network::BscMainnet, MULTICALL3),
    (Network::BscTestnet, MULTICALL3),
];

/// Look up the aggregator address for `network` in the `version` table.
pub fn aggregator_address(version: AggregatorVersion, network: Network) -> Option<Address> {
    version
        .table()
        .iter()
        .find(|(n, _)| *n == network)
        .map(|(_, addr)| *addr)
}
