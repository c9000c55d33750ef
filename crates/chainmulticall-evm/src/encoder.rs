//! `NormalizedValue` → alloy `DynSolValue` conversion for call arguments.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, FixedBytes, I256, U256};
use chainmulticall_core::types::NormalizedValue;
use std::str::FromStr;

/// Convert a `NormalizedValue` to the alloy `DynSolValue` for the given expected type.
pub fn normalized_to_dyn_value(
    val: &NormalizedValue,
    expected: &DynSolType,
) -> Result<DynSolValue, String> {
    match (val, expected) {
        (NormalizedValue::Bool(b), DynSolType::Bool) => Ok(DynSolValue::Bool(*b)),

        (NormalizedValue::Uint(u), DynSolType::Uint(bits)) => {
            Ok(DynSolValue::Uint(check_uint(U256::from(*u), *bits)?, *bits))
        }
        (NormalizedValue::BigUint(s), DynSolType::Uint(bits)) => {
            let u = U256::from_str(s).map_err(|e| format!("BigUint parse: {e}"))?;
            Ok(DynSolValue::Uint(check_uint(u, *bits)?, *bits))
        }

        (NormalizedValue::Int(i), DynSolType::Int(bits)) => {
            let i = I256::try_from(*i).map_err(|e| e.to_string())?;
            Ok(DynSolValue::Int(check_int(i, *bits)?, *bits))
        }
        (NormalizedValue::BigInt(s), DynSolType::Int(bits)) => {
            let i = I256::from_str(s).map_err(|e| format!("BigInt parse: {e}"))?;
            Ok(DynSolValue::Int(check_int(i, *bits)?, *bits))
        }

        (NormalizedValue::Address(s), DynSolType::Address) => {
            let addr = Address::from_str(s).map_err(|e| format!("address parse: {e}"))?;
            Ok(DynSolValue::Address(addr))
        }

        (NormalizedValue::Bytes(b), DynSolType::Bytes) => Ok(DynSolValue::Bytes(b.clone())),

        (NormalizedValue::Bytes(b), DynSolType::FixedBytes(n)) => {
            if b.len() != *n {
                return Err(format!("bytes{n}: got {} bytes", b.len()));
            }
            let mut word = [0u8; 32];
            word[..b.len()].copy_from_slice(b);
            Ok(DynSolValue::FixedBytes(FixedBytes::from(word), *n))
        }

        (NormalizedValue::Str(s), DynSolType::String) => Ok(DynSolValue::String(s.clone())),

        (NormalizedValue::Array(elems), DynSolType::Array(inner)) => {
            let dyn_elems: Result<Vec<_>, _> =
                elems.iter().map(|e| normalized_to_dyn_value(e, inner)).collect();
            Ok(DynSolValue::Array(dyn_elems?))
        }

        (NormalizedValue::Array(elems), DynSolType::FixedArray(inner, len)) => {
            if elems.len() != *len {
                return Err(format!(
                    "fixed array length mismatch: expected {len}, got {}",
                    elems.len()
                ));
            }
            let dyn_elems: Result<Vec<_>, _> =
                elems.iter().map(|e| normalized_to_dyn_value(e, inner)).collect();
            Ok(DynSolValue::FixedArray(dyn_elems?))
        }

        (NormalizedValue::Tuple(fields), DynSolType::Tuple(types)) => {
            if fields.len() != types.len() {
                return Err(format!(
                    "tuple length mismatch: expected {}, got {}",
                    types.len(),
                    fields.len()
                ));
            }
            let dyn_elems: Result<Vec<_>, _> = fields
                .iter()
                .zip(types.iter())
                .map(|((_, v), t)| normalized_to_dyn_value(v, t))
                .collect();
            Ok(DynSolValue::Tuple(dyn_elems?))
        }

        _ => Err(format!(
            "cannot convert {} to {}",
            val.kind(),
            expected.sol_type_name()
        )),
    }
}

/// `u` must fit in `bits` bits.
fn check_uint(u: U256, bits: usize) -> Result<U256, String> {
    if bits < 256 && u.bit_len() > bits {
        return Err(format!("{u} does not fit in uint{bits}"));
    }
    Ok(u)
}

/// `i` must lie in `[-2^(bits-1), 2^(bits-1))`.
fn check_int(i: I256, bits: usize) -> Result<I256, String> {
    // For negative values `!raw` is `-i - 1`, the magnitude bound is then the same.
    let raw = i.into_raw();
    let magnitude = if i.is_negative() { !raw } else { raw };
    if bits < 256 && magnitude.bit_len() >= bits {
        return Err(format!("{i} does not fit in int{bits}"));
    }
    Ok(i)
}
