//! A reconnecting WebSocket [`Transport`] with subscription routing.
//!
//! A [`WsTransport`] owns a background task (see [`backend`]) that holds
//! the actual socket, a correlation map routing responses back to pending
//! [`call`](Transport::call) futures, and a subscription router dispatching
//! `eth_subscription` notifications to their consumer's channel.

mod backend;
mod connect;
mod handle;
mod state;

pub use connect::{Authorization, WsConnect};
pub use state::{ConnectionState, StateRx};

use async_trait::async_trait;
use chainrpc_json_rpc::{Id, RequestPacket, Response, ResponsePacket};
use chainrpc_primitives::U256;
use chainrpc_transport::{PubsubTransport, SubscriptionStream, Transport, TransportError, TransportErrorKind};
use handle::SharedState;
use serde_json::value::RawValue;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// A JSON-RPC [`Transport`] over a single reconnecting WebSocket
/// connection, additionally implementing [`PubsubTransport`].
#[derive(Debug, Clone)]
pub struct WsTransport {
    shared: Arc<SharedState>,
    outbound: mpsc::UnboundedSender<Box<RawValue>>,
    state_rx: StateRx,
}

impl WsTransport {
    /// Connect to `config`'s URL, spawning the background connection task.
    ///
    /// This returns immediately; the connection itself happens
    /// asynchronously, observable through [`WsTransport::state`].
    pub fn connect(config: WsConnect) -> Self {
        let shared = SharedState::new();
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = state::StateTx::new();

        tokio::spawn(backend::run(config, shared.clone(), state_tx, outbound_rx));

        Self { shared, outbound, state_rx }
    }

    /// The transport's current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// A receiver that observes every [`ConnectionState`] transition.
    pub fn state_stream(&self) -> StateRx {
        self.state_rx.clone()
    }

    fn send_single(&self, id: Id, payload: Box<RawValue>) -> oneshot::Receiver<Response> {
        let (tx, rx) = oneshot::channel();
        self.shared.register(id, tx);
        // A send error means the backend task has exited; the registered
        // slot is cleaned up by `fail_all_pending` and the oneshot sender
        // drop will be observed by the receiver as a closed channel.
        let _ = self.outbound.send(payload);
        rx
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn call(&self, request: RequestPacket) -> Result<ResponsePacket, TransportError> {
        match request {
            RequestPacket::Single(req) => {
                let id = req.id.clone();
                let payload = req.serialize().map_err(TransportErrorKind::custom)?;
                let rx = self.send_single(id, payload);
                let resp = rx.await.map_err(|_| TransportErrorKind::backend_gone())?;
                Ok(ResponsePacket::Single(resp))
            }
            RequestPacket::Batch(reqs) => {
                // A persistent socket needs no wire-level batching: each
                // request is framed and dispatched independently, and
                // responses are routed back to their own waiter by id
                // regardless of arrival order.
                let mut waiters = Vec::with_capacity(reqs.len());
                for req in &reqs {
                    let id = req.id.clone();
                    let payload = req.serialize().map_err(TransportErrorKind::custom)?;
                    waiters.push((id.clone(), self.send_single(id, payload)));
                }
                let mut responses = Vec::with_capacity(waiters.len());
                for (id, rx) in waiters {
                    match rx.await {
                        Ok(resp) => responses.push(resp),
                        Err(_) => return Err(TransportErrorKind::missing_batch_response(id)),
                    }
                }
                Ok(ResponsePacket::Batch(responses))
            }
        }
    }
}

#[async_trait]
impl PubsubTransport for WsTransport {
    async fn subscribe(&self, subscription_id: U256) -> Result<SubscriptionStream, TransportError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.shared.install_subscription(subscription_id, tx);
        Ok(rx)
    }

    async fn unsubscribe(&self, subscription_id: U256) -> Result<(), TransportError> {
        self.shared.remove_subscription(&subscription_id);
        Ok(())
    }
}
