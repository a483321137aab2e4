//! The single-request dispatch path.

use chainrpc_json_rpc::{Request, RequestPacket, ResponsePacket, RpcError};
use chainrpc_transport::{Transport, TransportErrorKind};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

use crate::batch::Batch;

/// The deadline applied to a call when none is set via [`RpcClient::with_timeout`].
///
/// This bounds calls against transports that have no native per-request
/// deadline of their own (e.g. a persistent WebSocket connection whose
/// request never gets a reply), independent of whatever timeout a concrete
/// transport like [`chainrpc_transport_http::HttpTransport`] applies itself.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A JSON-RPC client generic over its transport.
///
/// Cloning a client is cheap: it only clones the underlying transport,
/// which implementations (e.g. [`chainrpc_transport_http::HttpTransport`])
/// are expected to make cheap to clone themselves (an `Arc`-backed client,
/// a shared connection pool, ...).
#[derive(Debug, Clone)]
pub struct RpcClient<T> {
    transport: T,
    timeout: Duration,
}

impl<T> RpcClient<T> {
    /// Wrap `transport` in a client, with a 30 second call deadline.
    pub fn new(transport: T) -> Self {
        Self { transport, timeout: DEFAULT_TIMEOUT }
    }

    /// Overrides the deadline applied to every call made through this
    /// client.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> RpcClient<T> {
    /// Call `method` with `params`, awaiting and decoding the response.
    ///
    /// A decoded `null` response counts as valid; callers expecting a
    /// non-null result should check for that themselves, matching how
    /// Ethereum nodes answer "not found" queries (e.g.
    /// `eth_getTransactionReceipt` for a pending transaction).
    pub async fn request<P, R>(&self, method: &'static str, params: &P) -> Result<R, RpcError<TransportErrorKind>>
    where
        P: Serialize + Send + Sync,
        R: DeserializeOwned,
    {
        let request = Request::new(method, params).map_err(RpcError::SerError)?;
        let id = request.id.clone();

        let response_packet = self.send_packet(RequestPacket::Single(request)).await?;
        let response = match response_packet {
            ResponsePacket::Single(resp) => resp,
            ResponsePacket::Batch(_) => {
                return Err(RpcError::InvalidResponse(
                    "transport answered a single request with a batch".to_owned(),
                ))
            }
        };

        if response.id != id {
            return Err(RpcError::InvalidResponse(format!(
                "response id {:?} does not match request id {:?}",
                response.id, id
            )));
        }

        match response.payload {
            chainrpc_json_rpc::ResponsePayload::Success(raw) => serde_json::from_str(raw.get())
                .map_err(|err| RpcError::InvalidResponse(err.to_string())),
            chainrpc_json_rpc::ResponsePayload::Failure(err) => Err(RpcError::ErrorResp(err)),
        }
    }

    /// Start a new batch of calls against this client.
    pub fn new_batch(&self) -> Batch<'_, T> {
        Batch::new(self)
    }

    pub(crate) async fn send_packet(
        &self,
        packet: RequestPacket,
    ) -> Result<ResponsePacket, RpcError<TransportErrorKind>> {
        match tokio::time::timeout(self.timeout, self.transport.call(packet)).await {
            Ok(result) => result,
            Err(_) => Err(RpcError::CallTimeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chainrpc_transport::TransportError;

    #[derive(Debug, Clone, Default)]
    struct NeverResponds;

    #[async_trait]
    impl Transport for NeverResponds {
        async fn call(&self, _request: RequestPacket) -> Result<ResponsePacket, TransportError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn a_stalled_call_times_out() {
        let client = RpcClient::new(NeverResponds).with_timeout(Duration::from_millis(10));
        let err = client.request::<_, ()>("eth_blockNumber", &()).await.unwrap_err();
        assert!(matches!(err, RpcError::CallTimeout));
    }
}
