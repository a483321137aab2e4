//! The abstraction an RPC client dispatches requests through.

use crate::TransportError;
use async_trait::async_trait;
use chainrpc_json_rpc::{RequestPacket, ResponsePacket};

/// Something that can carry a JSON-RPC request packet to a server and bring
/// back its response packet.
///
/// Implementors own their connection's lifecycle (opening a socket, retrying
/// a broken HTTP connection, reconnecting a WebSocket) and only need to
/// answer: given a packet, what came back?
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and await its response.
    async fn call(&self, request: RequestPacket) -> Result<ResponsePacket, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn call(&self, request: RequestPacket) -> Result<ResponsePacket, TransportError> {
        (**self).call(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn call(&self, request: RequestPacket) -> Result<ResponsePacket, TransportError> {
        (**self).call(request).await
    }
}
