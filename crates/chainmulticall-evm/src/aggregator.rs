//! The on-chain aggregator contract and the two submission strategies.
//!
//! Both methods exist with the same signatures on Multicall2 and Multicall3;
//! the original Multicall (V1) only has `aggregate`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use chainmulticall_core::{
    call::{AggregationResult, CallOptions, CallResult, EncodedCall},
    error::{MulticallError, TransportError},
    network::{aggregator_address, AggregatorVersion, Network},
    transport::RpcTransport,
};

sol! {
    /// Read entry points shared by Multicall2 and Multicall3.
    interface IMulticall2 {
        struct Call {
            address target;
            bytes callData;
        }

        struct Result {
            bool success;
            bytes returnData;
        }

        function aggregate(Call[] calls)
            external
            returns (uint256 blockNumber, bytes[] returnData);

        function tryAggregate(bool requireSuccess, Call[] calls)
            external
            returns (Result[] returnData);
    }
}

/// `aggregate((address,bytes)[])`
pub const AGGREGATE_SELECTOR: [u8; 4] = IMulticall2::aggregateCall::SELECTOR;
/// `tryAggregate(bool,(address,bytes)[])`
pub const TRY_AGGREGATE_SELECTOR: [u8; 4] = IMulticall2::tryAggregateCall::SELECTOR;

/// Submits an encoded batch to an aggregator contract in one round-trip.
///
/// Implementations never retry and never decode individual results; that is
/// left to the unpacker.
#[async_trait]
pub trait Aggregator: Send + Sync {
    /// Strategy name, used in errors and logs.
    fn name(&self) -> &'static str;

    async fn submit(&self, batch: &[EncodedCall]) -> Result<AggregationResult, MulticallError>;
}

/// Handle to a deployed aggregator contract.
pub struct MulticallContract {
    address: Address,
    transport: Arc<dyn RpcTransport>,
    options: CallOptions,
    next_id: AtomicU64,
}

impl MulticallContract {
    pub fn new(address: Address, transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            address,
            transport,
            options: CallOptions::default(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Use the registered `version` deployment for `network`.
    pub fn for_network(
        transport: Arc<dyn RpcTransport>,
        network: Network,
        version: AggregatorVersion,
    ) -> Result<Self, MulticallError> {
        let address = aggregator_address(version, network)
            .ok_or(MulticallError::UnknownDeployment { network, version })?;
        Ok(Self::new(address, transport))
    }

    /// Call options (block tag, caller) passed through to every `eth_call`.
    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn options(&self) -> &CallOptions {
        &self.options
    }

    pub fn transport(&self) -> &Arc<dyn RpcTransport> {
        &self.transport
    }

    /// All-or-nothing strategy.
    pub fn strict(&self) -> Aggregate<'_> {
        Aggregate { contract: self }
    }

    /// Per-call success strategy. With `require_success` the contract itself
    /// reverts if any sub-call fails.
    pub fn tolerant(&self, require_success: bool) -> TryAggregate<'_> {
        TryAggregate {
            contract: self,
            require_success,
        }
    }

    /// Call `aggregate` and return `(blockNumber, returnData)`.
    pub async fn aggregate(
        &self,
        batch: &[EncodedCall],
    ) -> Result<(U256, Vec<Vec<u8>>), TransportError> {
        let calldata = IMulticall2::aggregateCall {
            calls: sol_calls(batch),
        }
        .abi_encode();
        let output = self.eth_call(calldata).await?;
        decode_aggregate(&output)
    }

    /// Call `tryAggregate` and return one `(success, returnData)` per call.
    pub async fn try_aggregate(
        &self,
        require_success: bool,
        batch: &[EncodedCall],
    ) -> Result<Vec<CallResult>, TransportError> {
        let calldata = IMulticall2::tryAggregateCall {
            requireSuccess: require_success,
            calls: sol_calls(batch),
        }
        .abi_encode();
        let output = self.eth_call(calldata).await?;
        decode_try_aggregate(&output)
    }

    async fn eth_call(&self, calldata: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let params = self.options.eth_call_params(self.address, &calldata);
        let result = self.transport.request(id, "eth_call", params).await?;

        let hex_str = result
            .as_str()
            .ok_or_else(|| TransportError::InvalidResponse(format!("eth_call returned {result}")))?;
        hex::decode(hex_str.strip_prefix("0x").unwrap_or(hex_str))
            .map_err(|e| TransportError::InvalidResponse(format!("eth_call result is not hex: {e}")))
    }
}

impl std::fmt::Debug for MulticallContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MulticallContract")
            .field("address", &self.address)
            .field("transport", &self.transport.url())
            .field("options", &self.options)
            .finish()
    }
}

/// Strict strategy: `aggregate`. Any failing sub-call reverts the whole call.
#[derive(Debug, Clone, Copy)]
pub struct Aggregate<'c> {
    contract: &'c MulticallContract,
}

#[async_trait]
impl Aggregator for Aggregate<'_> {
    fn name(&self) -> &'static str {
        "aggregate"
    }

    async fn submit(&self, batch: &[EncodedCall]) -> Result<AggregationResult, MulticallError> {
        let (block_number, return_data) =
            self.contract.aggregate(batch).await.map_err(|source| {
                tracing::warn!(
                    aggregator = %self.contract.address,
                    calls = batch.len(),
                    error = %source,
                    "aggregate failed"
                );
                MulticallError::Aggregation {
                    strategy: self.name(),
                    source,
                }
            })?;

        tracing::debug!(%block_number, results = return_data.len(), "aggregate returned");
        Ok(AggregationResult::Strict {
            block_number,
            return_data,
        })
    }
}

/// Tolerant strategy: `tryAggregate`, reporting success per call.
#[derive(Debug, Clone, Copy)]
pub struct TryAggregate<'c> {
    contract: &'c MulticallContract,
    require_success: bool,
}

#[async_trait]
impl Aggregator for TryAggregate<'_> {
    fn name(&self) -> &'static str {
        "tryAggregate"
    }

    async fn submit(&self, batch: &[EncodedCall]) -> Result<AggregationResult, MulticallError> {
        let results = self
            .contract
            .try_aggregate(self.require_success, batch)
            .await
            .map_err(|source| {
                tracing::warn!(
                    aggregator = %self.contract.address,
                    calls = batch.len(),
                    require_success = self.require_success,
                    error = %source,
                    "tryAggregate failed"
                );
                MulticallError::Aggregation {
                    strategy: self.name(),
                    source,
                }
            })?;

        let failed = results.iter().filter(|r| !r.success).count();
        tracing::debug!(results = results.len(), failed, "tryAggregate returned");
        Ok(AggregationResult::Tolerant(results))
    }
}

fn sol_calls(batch: &[EncodedCall]) -> Vec<IMulticall2::Call> {
    batch
        .iter()
        .map(|c| IMulticall2::Call {
            target: c.target,
            callData: c.call_data.clone().into(),
        })
        .collect()
}

fn decode_aggregate(output: &[u8]) -> Result<(U256, Vec<Vec<u8>>), TransportError> {
    let ret = IMulticall2::aggregateCall::abi_decode_returns(output, true)
        .map_err(|e| TransportError::InvalidResponse(format!("aggregate output: {e}")))?;
    let return_data = ret.returnData.into_iter().map(|b| b.to_vec()).collect();
    Ok((ret.blockNumber, return_data))
}

fn decode_try_aggregate(output: &[u8]) -> Result<Vec<CallResult>, TransportError> {
    let ret = IMulticall2::tryAggregateCall::abi_decode_returns(output, true)
        .map_err(|e| TransportError::InvalidResponse(format!("tryAggregate output: {e}")))?;
    Ok(ret
        .returnData
        .into_iter()
        .map(|r| CallResult {
            success: r.success,
            return_data: r.returnData.to_vec(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_core::dyn_abi::DynSolValue;
    use alloy_primitives::keccak256;
    use chainmulticall_core::request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
    use serde_json::Value;
    use std::sync::Mutex;

    /// Answers every request with a fixed result (or error) and records it.
    struct MockTransport {
        reply: Result<Value, JsonRpcError>,
        seen: Mutex<Vec<JsonRpcRequest>>,
    }

    impl MockTransport {
        fn ok(output: &[u8]) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(Value::String(format!("0x{}", hex::encode(output)))),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn reverting() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(JsonRpcError {
                    code: 3,
                    message: "execution reverted: Multicall aggregate: call failed".into(),
                    data: None,
                }),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl RpcTransport for MockTransport {
        async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
            let id = req.id.clone();
            self.seen.lock().unwrap().push(req);
            Ok(match &self.reply {
                Ok(v) => JsonRpcResponse::success(id, v.clone()),
                Err(e) => JsonRpcResponse::failure(id, e.clone()),
            })
        }

        fn url(&self) -> &str {
            "mock"
        }
    }

    fn sample_batch() -> Vec<EncodedCall> {
        vec![
            EncodedCall::new(Address::repeat_byte(0x11), vec![0x01, 0x02]),
            EncodedCall::new(Address::repeat_byte(0x22), vec![]),
        ]
    }

    #[test]
    fn selectors_match_signatures() {
        assert_eq!(AGGREGATE_SELECTOR, [0x25, 0x2d, 0xba, 0x42]);
        assert_eq!(TRY_AGGREGATE_SELECTOR, [0xbc, 0xe3, 0x8b, 0xd7]);
        assert_eq!(keccak256("aggregate((address,bytes)[])")[..4], AGGREGATE_SELECTOR);
        assert_eq!(
            keccak256("tryAggregate(bool,(address,bytes)[])")[..4],
            TRY_AGGREGATE_SELECTOR
        );
    }

    #[test]
    fn aggregate_calldata_layout() {
        let calldata = IMulticall2::aggregateCall {
            calls: sol_calls(&sample_batch()),
        }
        .abi_encode();
        assert_eq!(&calldata[..4], &AGGREGATE_SELECTOR);
        // head: offset to the array = 0x20
        assert_eq!(U256::from_be_slice(&calldata[4..36]), U256::from(0x20));
        // array length
        assert_eq!(U256::from_be_slice(&calldata[36..68]), U256::from(2));
    }

    #[test]
    fn decode_aggregate_output() {
        let output = DynSolValue::Tuple(vec![
            DynSolValue::Uint(U256::from(19_000_000u64), 256),
            DynSolValue::Array(vec![
                DynSolValue::Bytes(vec![0xaa]),
                DynSolValue::Bytes(vec![]),
            ]),
        ])
        .abi_encode_params();

        let (block, data) = decode_aggregate(&output).unwrap();
        assert_eq!(block, U256::from(19_000_000u64));
        assert_eq!(data, vec![vec![0xaa], vec![]]);
    }

    #[test]
    fn decode_garbage_is_invalid_response() {
        assert!(matches!(
            decode_try_aggregate(&[0x01, 0x02]),
            Err(TransportError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn tolerant_submit_sends_one_eth_call() {
        let output = DynSolValue::Tuple(vec![DynSolValue::Array(vec![
            DynSolValue::Tuple(vec![DynSolValue::Bool(true), DynSolValue::Bytes(vec![0x01])]),
            DynSolValue::Tuple(vec![DynSolValue::Bool(false), DynSolValue::Bytes(vec![])]),
        ])])
        .abi_encode_params();
        let transport = MockTransport::ok(&output);
        let contract = MulticallContract::new(Address::repeat_byte(0xcc), transport.clone());

        let result = contract.tolerant(false).submit(&sample_batch()).await.unwrap();
        assert_eq!(result.success_flags(), vec![true, false]);

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, "eth_call");
        assert_eq!(seen[0].params[0]["to"], format!("{:#x}", Address::repeat_byte(0xcc)));
        let data = seen[0].params[0]["data"].as_str().unwrap();
        assert!(data.starts_with("0xbce38bd7"));
    }

    #[tokio::test]
    async fn revert_is_aggregation_error() {
        let contract = MulticallContract::new(Address::ZERO, MockTransport::reverting());
        let err = contract.strict().submit(&sample_batch()).await.unwrap_err();
        match err {
            MulticallError::Aggregation { strategy, source } => {
                assert_eq!(strategy, "aggregate");
                assert!(source.is_execution_error());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_hex_result_is_aggregation_error() {
        let transport = Arc::new(MockTransport {
            reply: Ok(Value::Bool(true)),
            seen: Mutex::new(Vec::new()),
        });
        let contract = MulticallContract::new(Address::ZERO, transport);
        let err = contract.tolerant(true).submit(&sample_batch()).await.unwrap_err();
        assert!(matches!(
            err,
            MulticallError::Aggregation {
                source: TransportError::InvalidResponse(_),
                ..
            }
        ));
    }

    #[test]
    fn for_network_rejects_missing_deployment() {
        let err = MulticallContract::for_network(
            MockTransport::ok(&[]),
            Network::BscMainnet,
            AggregatorVersion::V1,
        )
        .unwrap_err();
        assert!(matches!(err, MulticallError::UnknownDeployment { .. }));

        let contract = MulticallContract::for_network(
            MockTransport::ok(&[]),
            Network::EthMainnet,
            AggregatorVersion::V2,
        )
        .unwrap();
        assert_eq!(
            contract.address(),
            "0x5ba1e12693dc8f9c48aad8770482f4739beed696".parse::<Address>().unwrap()
        );
    }
}
