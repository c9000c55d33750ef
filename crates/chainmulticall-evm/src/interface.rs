//! Contract interface definition: ABI JSON → call data and back.
//!
//! # How it works
//! - Call data = `keccak256(signature)[:4] ++ abi_encode_params(args)`
//! - Return data = ABI-encoded tuple of the function's declared outputs
//!
//! # Usage
//! ```ignore
//! let erc20 = ContractInterface::from_abi_json(ERC20_ABI)?;
//! let calldata = erc20.encode_call("balanceOf", &[
//!     NormalizedValue::Address("0xd8dA...".into()),
//! ])?;
//! let outputs = erc20.decode_output("balanceOf", &return_data)?;
//! ```

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_dyn_abi::Specifier;
use alloy_json_abi::{Function, JsonAbi, Param};
use chainmulticall_core::{error::AbiError, types::NormalizedValue};

use crate::encoder::normalized_to_dyn_value;
use crate::normalizer;

/// ABI of one contract, used to encode its calls and decode its return data.
///
/// Overloaded function names resolve to the first declaration in the ABI.
#[derive(Debug, Clone)]
pub struct ContractInterface {
    abi: JsonAbi,
}

impl ContractInterface {
    pub fn new(abi: JsonAbi) -> Self {
        Self { abi }
    }

    /// Create an interface from a standard Ethereum ABI JSON string.
    ///
    /// # Errors
    /// Returns `AbiError::InvalidAbi` if the JSON is not valid ABI JSON.
    pub fn from_abi_json(abi_json: &str) -> Result<Self, AbiError> {
        let abi: JsonAbi = serde_json::from_str(abi_json).map_err(|e| AbiError::InvalidAbi {
            reason: format!("invalid ABI JSON: {e}"),
        })?;
        Ok(Self { abi })
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// Look up a function by name.
    pub fn function(&self, name: &str) -> Result<&Function, AbiError> {
        self.abi
            .functions()
            .find(|f| f.name == name)
            .ok_or_else(|| AbiError::FunctionNotFound { name: name.to_string() })
    }

    /// Returns all function names in this ABI.
    pub fn function_names(&self) -> Vec<&str> {
        self.abi.functions().map(|f| f.name.as_str()).collect()
    }

    /// Returns the 4-byte selector for a named function.
    pub fn selector_for(&self, name: &str) -> Option<[u8; 4]> {
        self.function(name).ok().map(|f| f.selector().0)
    }

    /// Encode a function call to call data bytes.
    ///
    /// `args` must be in declaration order and match the ABI parameter count
    /// and types.
    pub fn encode_call(&self, method: &str, args: &[NormalizedValue]) -> Result<Vec<u8>, AbiError> {
        let func = self.function(method)?;
        check_count(func.inputs.len(), args.len())?;

        let mut values = Vec::with_capacity(args.len());
        for (i, (param, arg)) in func.inputs.iter().zip(args).enumerate() {
            let ty = resolve(param, i)?;
            let value = normalized_to_dyn_value(arg, &ty).map_err(|reason| {
                AbiError::InvalidArgument {
                    param: param_name(param, i),
                    reason,
                }
            })?;
            values.push(value);
        }

        let encoded = DynSolValue::Tuple(values).abi_encode_params();
        let mut calldata = func.selector().to_vec();
        calldata.extend_from_slice(&encoded);
        Ok(calldata)
    }

    /// Decode `data` as the return value of `method`, one value per declared output.
    pub fn decode_output(&self, method: &str, data: &[u8]) -> Result<Vec<NormalizedValue>, AbiError> {
        let values = self.decode_values(method, data)?;
        Ok(values.into_iter().map(normalizer::normalize).collect())
    }

    /// Decode `data` as the return value of `method` without normalizing.
    pub fn decode_values(&self, method: &str, data: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
        let func = self.function(method)?;
        let types = func
            .outputs
            .iter()
            .enumerate()
            .map(|(i, p)| resolve(p, i))
            .collect::<Result<Vec<_>, _>>()?;

        if types.is_empty() {
            return Ok(vec![]);
        }

        let decoded = DynSolType::Tuple(types)
            .abi_decode_params(data)
            .map_err(|e| AbiError::DecodeFailed {
                reason: format!("{method} output: {e}"),
            })?;

        match decoded {
            DynSolValue::Tuple(values) => Ok(values),
            other => Ok(vec![other]),
        }
    }
}

fn check_count(expected: usize, got: usize) -> Result<(), AbiError> {
    if expected != got {
        return Err(AbiError::ArgumentCount { expected, got });
    }
    Ok(())
}

fn resolve(param: &Param, index: usize) -> Result<DynSolType, AbiError> {
    param.resolve().map_err(|e| AbiError::InvalidAbi {
        reason: format!("param '{}': {e}", param_name(param, index)),
    })
}

fn param_name(param: &Param, index: usize) -> String {
    if param.name.is_empty() {
        format!("arg{index}")
    } else {
        param.name.clone()
    }
}
