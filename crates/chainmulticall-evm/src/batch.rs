//! Call descriptors and the batch builder.
//!
//! A [`Calls`] batch borrows everything it needs from the caller: interfaces
//! and output holders. [`Calls::execute`] consumes the batch, so once it
//! returns the caller can read its holders again.

use alloy_primitives::Address;
use chainmulticall_core::{
    call::{AggregationResult, BatchOutcome, EncodedCall},
    error::{AbiError, MulticallError, TransportError},
    slot::ReturnSlot,
    types::NormalizedValue,
};

use crate::aggregator::Aggregator;
use crate::interface::ContractInterface;
use crate::unpack;

/// One contract read: where to call, what to call, and where the result goes.
pub struct Call<'a> {
    pub target: Address,
    pub interface: &'a ContractInterface,
    pub method: String,
    pub args: Vec<NormalizedValue>,
    pub output: &'a mut dyn ReturnSlot,
}

impl<'a> Call<'a> {
    pub fn new(
        target: Address,
        interface: &'a ContractInterface,
        method: impl Into<String>,
        output: &'a mut dyn ReturnSlot,
    ) -> Self {
        Self {
            target,
            interface,
            method: method.into(),
            args: Vec::new(),
            output,
        }
    }

    /// Append one argument (declaration order).
    pub fn arg(mut self, value: impl Into<NormalizedValue>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Replace all arguments.
    pub fn args(mut self, args: Vec<NormalizedValue>) -> Self {
        self.args = args;
        self
    }

    /// Encode this call into an aggregator entry.
    pub fn encode(&self) -> Result<EncodedCall, AbiError> {
        let call_data = self.interface.encode_call(&self.method, &self.args)?;
        Ok(EncodedCall::new(self.target, call_data))
    }

    /// Decode `data` with this call's interface and write it into the output holder.
    pub fn decode_into(&mut self, data: &[u8]) -> Result<(), AbiError> {
        let outputs = self.interface.decode_output(&self.method, data)?;
        self.output.fill(outputs)
    }
}

impl std::fmt::Debug for Call<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Call")
            .field("target", &self.target)
            .field("method", &self.method)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// An ordered batch of calls. Results are matched back by position.
#[derive(Debug, Default)]
pub struct Calls<'a> {
    calls: Vec<Call<'a>>,
}

impl<'a> Calls<'a> {
    pub fn new(calls: Vec<Call<'a>>) -> Self {
        Self { calls }
    }

    pub fn push(&mut self, call: Call<'a>) {
        self.calls.push(call);
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Call<'a>> {
        self.calls.iter()
    }

    /// Encode every call, in order. Stops at the first call that cannot be
    /// encoded; no partial batch is returned.
    pub fn encode(&self) -> Result<Vec<EncodedCall>, MulticallError> {
        self.calls
            .iter()
            .enumerate()
            .map(|(index, call)| {
                call.encode().map_err(|source| MulticallError::Encoding {
                    index,
                    method: call.method.clone(),
                    source,
                })
            })
            .collect()
    }

    /// Encode, submit through `aggregator` (one round-trip), and decode every
    /// result into its call's output holder.
    ///
    /// On a decoding error, holders before the failing call keep their decoded
    /// values and holders after it are left untouched.
    pub async fn execute(mut self, aggregator: &dyn Aggregator) -> Result<BatchOutcome, MulticallError> {
        let batch = self.encode()?;
        let strategy = aggregator.name();

        tracing::debug!(calls = batch.len(), strategy, "submitting multicall batch");

        let result = aggregator.submit(&batch).await?;
        if result.len() != batch.len() {
            return Err(MulticallError::Aggregation {
                strategy,
                source: TransportError::InvalidResponse(format!(
                    "expected {} results, got {}",
                    batch.len(),
                    result.len()
                )),
            });
        }

        let success = result.success_flags();
        let block_number = match result {
            AggregationResult::Strict {
                block_number,
                return_data,
            } => {
                unpack::unpack_strict(&mut self.calls, &return_data)?;
                Some(block_number)
            }
            AggregationResult::Tolerant(results) => {
                unpack::unpack_tolerant(&mut self.calls, &results)?;
                None
            }
        };

        Ok(BatchOutcome {
            block_number,
            success,
        })
    }
}

impl<'a> FromIterator<Call<'a>> for Calls<'a> {
    fn from_iter<I: IntoIterator<Item = Call<'a>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> Extend<Call<'a>> for Calls<'a> {
    fn extend<I: IntoIterator<Item = Call<'a>>>(&mut self, iter: I) {
        self.calls.extend(iter);
    }
}
