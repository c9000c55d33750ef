//! Data that flows between the batch builder, the aggregator and the unpacker.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// One entry of the aggregator's `(address target, bytes callData)[]` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCall {
    pub target: Address,
    pub call_data: Vec<u8>,
}

impl EncodedCall {
    pub fn new(target: Address, call_data: Vec<u8>) -> Self {
        Self { target, call_data }
    }

    /// 4-byte selector prefix, if the payload is long enough to carry one.
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.call_data.get(..4).and_then(|s| s.try_into().ok())
    }
}

/// One `(bool success, bytes returnData)` entry returned by `tryAggregate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResult {
    pub success: bool,
    pub return_data: Vec<u8>,
}

/// Raw aggregator output, positionally aligned with the submitted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregationResult {
    /// `aggregate`: every sub-call succeeded.
    Strict {
        block_number: U256,
        return_data: Vec<Vec<u8>>,
    },
    /// `tryAggregate`: per-call success flags.
    Tolerant(Vec<CallResult>),
}

impl AggregationResult {
    pub fn len(&self) -> usize {
        match self {
            AggregationResult::Strict { return_data, .. } => return_data.len(),
            AggregationResult::Tolerant(results) => results.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-entry success flags; always `true` for the strict variant.
    pub fn success_flags(&self) -> Vec<bool> {
        match self {
            AggregationResult::Strict { return_data, .. } => vec![true; return_data.len()],
            AggregationResult::Tolerant(results) => results.iter().map(|r| r.success).collect(),
        }
    }
}

/// Summary returned by a completed batch. Decoded values live in the
/// caller's output holders, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Block number reported by `aggregate`; `None` for `tryAggregate`.
    pub block_number: Option<U256>,
    /// Whether each sub-call succeeded on-chain, in batch order.
    pub success: Vec<bool>,
}

impl BatchOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.success.iter().all(|ok| *ok)
    }

    pub fn failed_indices(&self) -> Vec<usize> {
        self.success
            .iter()
            .enumerate()
            .filter(|(_, ok)| !**ok)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Block parameter of `eth_call`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BlockTag {
    #[default]
    Latest,
    Pending,
    Earliest,
    Safe,
    Finalized,
    Number(u64),
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockTag::Latest => write!(f, "latest"),
            BlockTag::Pending => write!(f, "pending"),
            BlockTag::Earliest => write!(f, "earliest"),
            BlockTag::Safe => write!(f, "safe"),
            BlockTag::Finalized => write!(f, "finalized"),
            BlockTag::Number(n) => write!(f, "0x{n:x}"),
        }
    }
}

impl FromStr for BlockTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(BlockTag::Latest),
            "pending" => Ok(BlockTag::Pending),
            "earliest" => Ok(BlockTag::Earliest),
            "safe" => Ok(BlockTag::Safe),
            "finalized" => Ok(BlockTag::Finalized),
            other => {
                let parsed = match other.strip_prefix("0x") {
                    Some(hex) => u64::from_str_radix(hex, 16),
                    None => other.parse::<u64>(),
                };
                parsed
                    .map(BlockTag::Number)
                    .map_err(|e| format!("invalid block tag '{other}': {e}"))
            }
        }
    }
}

impl TryFrom<String> for BlockTag {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BlockTag> for String {
    fn from(tag: BlockTag) -> Self {
        tag.to_string()
    }
}

/// Options passed through unmodified to the aggregator's `eth_call`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallOptions {
    pub block: BlockTag,
    pub from: Option<Address>,
}

impl CallOptions {
    pub fn at_block(mut self, block: BlockTag) -> Self {
        self.block = block;
        self
    }

    pub fn from_address(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Build the `[callObject, blockTag]` params of `eth_call`.
    pub fn eth_call_params(&self, to: Address, data: &[u8]) -> Vec<Value> {
        let mut tx = json!({
            "to": format!("{to:#x}"),
            "data": format!("0x{}", hex::encode(data)),
        });
        if let Some(from) = self.from {
            tx["from"] = Value::String(format!("{from:#x}"));
        }
        vec![tx, Value::String(self.block.to_string())]
    }
}
