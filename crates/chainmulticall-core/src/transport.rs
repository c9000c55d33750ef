//! The `RpcTransport` trait: how the aggregator handle reaches a node.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// The async trait every RPC transport implements.
///
/// Implementations must be `Send + Sync` so a single transport can be shared
/// as `Arc<dyn RpcTransport>` by independent batches. Timeouts and any
/// connection management belong to the implementation.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Send a single JSON-RPC request and return the response.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// Return the transport's identifier (URL or name).
    fn url(&self) -> &str;

    /// Call a method and return the raw `result` value. JSON-RPC error
    /// objects become [`TransportError::Rpc`].
    async fn request(
        &self,
        id: u64,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, TransportError> {
        let req = JsonRpcRequest::new(id, method, params);
        let resp = self.send(req).await?;
        resp.into_result().map_err(TransportError::Rpc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{JsonRpcError, RpcId};
    use std::sync::Arc;

    struct MockTransport {
        revert: bool,
    }

    #[async_trait]
    impl RpcTransport for MockTransport {
        async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
            if self.revert {
                Ok(JsonRpcResponse::failure(
                    req.id,
                    JsonRpcError {
                        code: 3,
                        message: "execution reverted".into(),
                        data: None,
                    },
                ))
            } else {
                Ok(JsonRpcResponse::success(RpcId::Number(1), Value::String("0x2a".into())))
            }
        }

        fn url(&self) -> &str {
            "mock"
        }
    }

    #[tokio::test]
    async fn request_returns_raw_result() {
        let t = MockTransport { revert: false };
        let result = t.request(1, "eth_call", vec![]).await.unwrap();
        assert_eq!(result, Value::String("0x2a".into()));
    }

    #[tokio::test]
    async fn request_through_trait_object_surfaces_rpc_error() {
        let t: Arc<dyn RpcTransport> = Arc::new(MockTransport { revert: true });
        let err = t.request(1, "eth_call", vec![]).await.unwrap_err();
        assert!(err.is_execution_error());
    }
}
