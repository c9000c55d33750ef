//! The value model call arguments and decoded outputs are expressed in.
//!
//! EVM ABI values are mapped to a small set of Rust-friendly variants so that
//! descriptors can carry arguments for any method without generated bindings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A call argument or a decoded return value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum NormalizedValue {
    Uint(u128),
    /// Large uints (> u128) stored as decimal string
    BigUint(String),
    Int(i128),
    /// Large ints (> i128) stored as decimal string
    BigInt(String),
    Bool(bool),
    Bytes(Vec<u8>),
    Str(String),
    /// 20-byte address, hex with 0x prefix
    Address(String),
    Array(Vec<NormalizedValue>),
    Tuple(Vec<(String, NormalizedValue)>),
    Null,
}

impl NormalizedValue {
    /// Returns the inner string if this is an Address value.
    pub fn as_address(&self) -> Option<&str> {
        match self {
            NormalizedValue::Address(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Short variant name, used in type-mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizedValue::Uint(_) => "uint",
            NormalizedValue::BigUint(_) => "biguint",
            NormalizedValue::Int(_) => "int",
            NormalizedValue::BigInt(_) => "bigint",
            NormalizedValue::Bool(_) => "bool",
            NormalizedValue::Bytes(_) => "bytes",
            NormalizedValue::Str(_) => "string",
            NormalizedValue::Address(_) => "address",
            NormalizedValue::Array(_) => "array",
            NormalizedValue::Tuple(_) => "tuple",
            NormalizedValue::Null => "null",
        }
    }
}

impl fmt::Display for NormalizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedValue::Uint(v) => write!(f, "{v}"),
            NormalizedValue::BigUint(v) => write!(f, "{v}"),
            NormalizedValue::Int(v) => write!(f, "{v}"),
            NormalizedValue::BigInt(v) => write!(f, "{v}"),
            NormalizedValue::Bool(v) => write!(f, "{v}"),
            NormalizedValue::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            NormalizedValue::Str(s) => write!(f, "{s}"),
            NormalizedValue::Address(a) => write!(f, "{a}"),
            NormalizedValue::Array(v) => {
                let parts: Vec<_> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            NormalizedValue::Tuple(fields) => {
                let parts: Vec<_> = fields.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            NormalizedValue::Null => write!(f, "null"),
        }
    }
}

impl From<u128> for NormalizedValue {
    fn from(v: u128) -> Self {
        NormalizedValue::Uint(v)
    }
}

impl From<bool> for NormalizedValue {
    fn from(v: bool) -> Self {
        NormalizedValue::Bool(v)
    }
}

impl From<alloy_primitives::Address> for NormalizedValue {
    fn from(a: alloy_primitives::Address) -> Self {
        NormalizedValue::Address(format!("{a:#x}"))
    }
}
