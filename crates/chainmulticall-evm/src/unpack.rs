//! Result unpacking: raw aggregator payloads → caller output holders.
//!
//! Both passes stop at the first payload that fails to decode. Holders before
//! it keep their values, holders after it are not touched.

use chainmulticall_core::{call::CallResult, error::MulticallError};

use crate::batch::Call;

/// Decode every `aggregate` result into its call's holder.
pub fn unpack_strict(calls: &mut [Call<'_>], return_data: &[Vec<u8>]) -> Result<(), MulticallError> {
    for (index, (call, data)) in calls.iter_mut().zip(return_data).enumerate() {
        decode_one(index, call, data)?;
    }
    Ok(())
}

/// Decode the `tryAggregate` results whose sub-call succeeded. Failed
/// sub-calls leave their holder in the caller-provided state.
pub fn unpack_tolerant(calls: &mut [Call<'_>], results: &[CallResult]) -> Result<(), MulticallError> {
    for (index, (call, result)) in calls.iter_mut().zip(results).enumerate() {
        if !result.success {
            tracing::warn!(
                index,
                target = %call.target,
                method = %call.method,
                "sub-call failed, leaving output untouched"
            );
            continue;
        }
        decode_one(index, call, &result.return_data)?;
    }
    Ok(())
}

fn decode_one(index: usize, call: &mut Call<'_>, data: &[u8]) -> Result<(), MulticallError> {
    call.decode_into(data).map_err(|source| {
        tracing::warn!(index, method = %call.method, error = %source, "failed to decode result");
        MulticallError::Decoding {
            index,
            method: call.method.clone(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::ContractInterface;
    use alloy_core::dyn_abi::DynSolValue;
    use alloy_primitives::{Address, U256};

    const ERC20_ABI: &str = r#"[
        {
            "name": "balanceOf",
            "type": "function",
            "inputs": [{"name": "owner", "type": "address"}],
            "outputs": [{"name": "", "type": "uint256"}],
            "stateMutability": "view"
        }
    ]"#;

    fn uint_payload(v: u64) -> Vec<u8> {
        DynSolValue::Tuple(vec![DynSolValue::Uint(U256::from(v), 256)]).abi_encode_params()
    }

    #[test]
    fn strict_writes_all_in_order() {
        let erc20 = ContractInterface::from_abi_json(ERC20_ABI).unwrap();
        let (mut a, mut b) = (0u128, 0u128);
        {
            let mut calls = vec![
                Call::new(Address::ZERO, &erc20, "balanceOf", &mut a),
                Call::new(Address::ZERO, &erc20, "balanceOf", &mut b),
            ];
            unpack_strict(&mut calls, &[uint_payload(10), uint_payload(20)]).unwrap();
        }
        assert_eq!((a, b), (10, 20));
    }

    #[test]
    fn strict_failure_writes_prefix() {
        let erc20 = ContractInterface::from_abi_json(ERC20_ABI).unwrap();
        let (mut a, mut b, mut c) = (0u128, 0u128, 0u128);
        let err = {
            let mut calls = vec![
                Call::new(Address::ZERO, &erc20, "balanceOf", &mut a),
                Call::new(Address::ZERO, &erc20, "balanceOf", &mut b),
                Call::new(Address::ZERO, &erc20, "balanceOf", &mut c),
            ];
            unpack_strict(&mut calls, &[uint_payload(1), vec![0xde, 0xad], uint_payload(3)])
                .unwrap_err()
        };
        assert_eq!(err.call_index(), Some(1));
        assert_eq!((a, b, c), (1, 0, 0));
    }

    #[test]
    fn tolerant_skips_failed_entries() {
        let erc20 = ContractInterface::from_abi_json(ERC20_ABI).unwrap();
        let (mut a, mut b) = (0u128, 55u128);
        {
            let mut calls = vec![
                Call::new(Address::ZERO, &erc20, "balanceOf", &mut a),
                Call::new(Address::ZERO, &erc20, "balanceOf", &mut b),
            ];
            let results = [
                CallResult { success: true, return_data: uint_payload(7) },
                // Garbage in a failed entry is never looked at.
                CallResult { success: false, return_data: vec![0x08, 0xc3] },
            ];
            unpack_tolerant(&mut calls, &results).unwrap();
        }
        assert_eq!((a, b), (7, 55));
    }

    #[test]
    fn tolerant_stops_at_first_malformed_payload() {
        let erc20 = ContractInterface::from_abi_json(ERC20_ABI).unwrap();
        let (mut a, mut b, mut c) = (0u128, 0u128, 0u128);
        let err = {
            let mut calls = vec![
                Call::new(Address::ZERO, &erc20, "balanceOf", &mut a),
                Call::new(Address::ZERO, &erc20, "balanceOf", &mut b),
                Call::new(Address::ZERO, &erc20, "balanceOf", &mut c),
            ];
            let results = [
                CallResult { success: true, return_data: uint_payload(1) },
                CallResult { success: true, return_data: vec![] },
                CallResult { success: true, return_data: uint_payload(3) },
            ];
            unpack_tolerant(&mut calls, &results).unwrap_err()
        };
        assert!(matches!(err, MulticallError::Decoding { index: 1, .. }));
        assert_eq!((a, b, c), (1, 0, 0));
    }
}
