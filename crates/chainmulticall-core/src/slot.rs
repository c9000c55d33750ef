//! Output holders.
//!
//! A call descriptor carries a `&mut dyn ReturnSlot` pointing at storage the
//! caller owns. The unpacker hands it the decoded outputs of the call's method
//! and the slot writes itself. A slot is left untouched unless `fill` succeeds
//! for the typed implementations below.

use alloy_primitives::{Address, U256};
use std::str::FromStr;

use crate::error::AbiError;
use crate::types::NormalizedValue;

/// Caller-owned storage a decoded return value is written into.
pub trait ReturnSlot: Send {
    /// Write the decoded outputs (in declaration order) into `self`.
    fn fill(&mut self, outputs: Vec<NormalizedValue>) -> Result<(), AbiError>;
}

/// Every output, in declaration order.
impl ReturnSlot for Vec<NormalizedValue> {
    fn fill(&mut self, outputs: Vec<NormalizedValue>) -> Result<(), AbiError> {
        *self = outputs;
        Ok(())
    }
}

impl ReturnSlot for NormalizedValue {
    fn fill(&mut self, outputs: Vec<NormalizedValue>) -> Result<(), AbiError> {
        *self = single(outputs)?;
        Ok(())
    }
}

impl ReturnSlot for u128 {
    fn fill(&mut self, outputs: Vec<NormalizedValue>) -> Result<(), AbiError> {
        match single(outputs)? {
            NormalizedValue::Uint(v) => *self = v,
            other => return Err(mismatch("uint (<= u128)", &other)),
        }
        Ok(())
    }
}

impl ReturnSlot for u64 {
    fn fill(&mut self, outputs: Vec<NormalizedValue>) -> Result<(), AbiError> {
        match single(outputs)? {
            NormalizedValue::Uint(v) => {
                *self = u64::try_from(v).map_err(|_| AbiError::TypeMismatch {
                    expected: "uint (<= u64)".into(),
                    got: v.to_string(),
                })?;
            }
            other => return Err(mismatch("uint (<= u64)", &other)),
        }
        Ok(())
    }
}

impl ReturnSlot for U256 {
    fn fill(&mut self, outputs: Vec<NormalizedValue>) -> Result<(), AbiError> {
        match single(outputs)? {
            NormalizedValue::Uint(v) => *self = U256::from(v),
            NormalizedValue::BigUint(s) => {
                *self = U256::from_str(&s).map_err(|e| AbiError::TypeMismatch {
                    expected: "uint256".into(),
                    got: format!("{s} ({e})"),
                })?;
            }
            other => return Err(mismatch("uint256", &other)),
        }
        Ok(())
    }
}

impl ReturnSlot for bool {
    fn fill(&mut self, outputs: Vec<NormalizedValue>) -> Result<(), AbiError> {
        match single(outputs)? {
            NormalizedValue::Bool(b) => *self = b,
            other => return Err(mismatch("bool", &other)),
        }
        Ok(())
    }
}

impl ReturnSlot for String {
    fn fill(&mut self, outputs: Vec<NormalizedValue>) -> Result<(), AbiError> {
        match single(outputs)? {
            NormalizedValue::Str(s) => *self = s,
            other => return Err(mismatch("string", &other)),
        }
        Ok(())
    }
}

impl ReturnSlot for Vec<u8> {
    fn fill(&mut self, outputs: Vec<NormalizedValue>) -> Result<(), AbiError> {
        match single(outputs)? {
            NormalizedValue::Bytes(b) => *self = b,
            other => return Err(mismatch("bytes", &other)),
        }
        Ok(())
    }
}

impl ReturnSlot for Address {
    fn fill(&mut self, outputs: Vec<NormalizedValue>) -> Result<(), AbiError> {
        match single(outputs)? {
            NormalizedValue::Address(s) => {
                *self = Address::from_str(&s).map_err(|e| AbiError::TypeMismatch {
                    expected: "address".into(),
                    got: format!("{s} ({e})"),
                })?;
            }
            other => return Err(mismatch("address", &other)),
        }
        Ok(())
    }
}

/// `None` until the call decodes; lets callers tell "not written" from a zero value.
impl<T: ReturnSlot + Default> ReturnSlot for Option<T> {
    fn fill(&mut self, outputs: Vec<NormalizedValue>) -> Result<(), AbiError> {
        let mut value = T::default();
        value.fill(outputs)?;
        *self = Some(value);
        Ok(())
    }
}

/// One slot per output, e.g. `(u128, u128, u64)` for `getReserves()`.
/// Written only when every element decodes.
impl<A, B> ReturnSlot for (A, B)
where
    A: ReturnSlot + Default,
    B: ReturnSlot + Default,
{
    fn fill(&mut self, outputs: Vec<NormalizedValue>) -> Result<(), AbiError> {
        let [a, b] = exactly::<2>(outputs)?;
        let mut value = (A::default(), B::default());
        value.0.fill(vec![a])?;
        value.1.fill(vec![b])?;
        *self = value;
        Ok(())
    }
}

impl<A, B, C> ReturnSlot for (A, B, C)
where
    A: ReturnSlot + Default,
    B: ReturnSlot + Default,
    C: ReturnSlot + Default,
{
    fn fill(&mut self, outputs: Vec<NormalizedValue>) -> Result<(), AbiError> {
        let [a, b, c] = exactly::<3>(outputs)?;
        let mut value = (A::default(), B::default(), C::default());
        value.0.fill(vec![a])?;
        value.1.fill(vec![b])?;
        value.2.fill(vec![c])?;
        *self = value;
        Ok(())
    }
}

fn exactly<const N: usize>(outputs: Vec<NormalizedValue>) -> Result<[NormalizedValue; N], AbiError> {
    let got = outputs.len();
    outputs
        .try_into()
        .map_err(|_| AbiError::OutputCount { expected: N, got })
}

fn single(outputs: Vec<NormalizedValue>) -> Result<NormalizedValue, AbiError> {
    let got = outputs.len();
    let mut iter = outputs.into_iter();
    match (iter.next(), iter.next()) {
        (Some(v), None) => Ok(v),
        _ => Err(AbiError::OutputCount { expected: 1, got }),
    }
}

fn mismatch(expected: &str, got: &NormalizedValue) -> AbiError {
    AbiError::TypeMismatch {
        expected: expected.into(),
        got: got.kind().into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u128_slot() {
        let mut balance = 0u128;
        balance.fill(vec![NormalizedValue::Uint(42)]).unwrap();
        assert_eq!(balance, 42);
    }

    #[test]
    fn wrong_type_leaves_slot_untouched() {
        let mut balance = 7u128;
        let err = balance.fill(vec![NormalizedValue::Bool(true)]).unwrap_err();
        assert!(matches!(err, AbiError::TypeMismatch { .. }));
        assert_eq!(balance, 7);
    }

    #[test]
    fn wrong_arity_is_output_count() {
        let mut flag = false;
        let err = flag
            .fill(vec![NormalizedValue::Bool(true), NormalizedValue::Bool(false)])
            .unwrap_err();
        assert!(matches!(err, AbiError::OutputCount { expected: 1, got: 2 }));
    }

    #[test]
    fn u64_overflow_rejected() {
        let mut n = 0u64;
        assert!(n.fill(vec![NormalizedValue::Uint(u128::from(u64::MAX) + 1)]).is_err());
        n.fill(vec![NormalizedValue::Uint(9)]).unwrap();
        assert_eq!(n, 9);
    }

    #[test]
    fn u256_from_big_uint() {
        let mut v = U256::ZERO;
        v.fill(vec![NormalizedValue::BigUint(U256::MAX.to_string())]).unwrap();
        assert_eq!(v, U256::MAX);
    }

    #[test]
    fn address_slot() {
        let mut a = Address::ZERO;
        a.fill(vec![NormalizedValue::Address(
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".into(),
        )])
        .unwrap();
        assert_eq!(a, "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".parse::<Address>().unwrap());
    }

    #[test]
    fn option_slot_set_on_success_only() {
        let mut name: Option<String> = None;
        assert!(name.fill(vec![NormalizedValue::Uint(1)]).is_err());
        assert!(name.is_none());
        name.fill(vec![NormalizedValue::Str("Dai".into())]).unwrap();
        assert_eq!(name.as_deref(), Some("Dai"));
    }

    #[test]
    fn vec_slot_takes_everything() {
        let mut all: Vec<NormalizedValue> = Vec::new();
        all.fill(vec![NormalizedValue::Uint(1), NormalizedValue::Bool(false)]).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn tuple_slot_fills_each_element() {
        let mut reserves = (0u128, 0u128, 0u64);
        reserves
            .fill(vec![
                NormalizedValue::Uint(1_000),
                NormalizedValue::Uint(2_000),
                NormalizedValue::Uint(1_700_000_000),
            ])
            .unwrap();
        assert_eq!(reserves, (1_000, 2_000, 1_700_000_000));
    }

    #[test]
    fn tuple_slot_is_all_or_nothing() {
        let mut pair = (String::from("old"), 5u128);
        let err = pair
            .fill(vec![NormalizedValue::Str("new".into()), NormalizedValue::Bool(true)])
            .unwrap_err();
        assert!(matches!(err, AbiError::TypeMismatch { .. }));
        assert_eq!(pair, (String::from("old"), 5));

        let err = pair.fill(vec![NormalizedValue::Str("new".into())]).unwrap_err();
        assert!(matches!(err, AbiError::OutputCount { expected: 2, got: 1 }));
    }
}
