//! `eth_subscribe`/`eth_unsubscribe`-backed subscriptions.

use chainrpc_json_rpc::RpcError;
use chainrpc_primitives::U256;
use chainrpc_transport::{PubsubTransport, SubscriptionStream, TransportErrorKind};
use serde::{de::DeserializeOwned, Serialize};

use crate::client::RpcClient;

impl<T: PubsubTransport + Clone + 'static> RpcClient<T> {
    /// Issue an `eth_subscribe` call and return a [`Subscription`] yielding
    /// its notifications.
    ///
    /// The router entry mapping the server-assigned subscription id to this
    /// subscription's channel is installed before this call returns, so no
    /// notification can be lost between subscribing and the first `recv`.
    pub async fn subscribe<P>(&self, params: &P) -> Result<Subscription<T>, RpcError<TransportErrorKind>>
    where
        P: Serialize + Send + Sync,
    {
        let subscription_id: U256 = self.request("eth_subscribe", params).await?;
        let stream = self.transport().subscribe(subscription_id).await?;
        Ok(Subscription { id: subscription_id, stream, client: self.clone() })
    }
}

/// A live `eth_subscribe` subscription.
///
/// Each notification is decoded lazily, on the consumer side, to keep the
/// router's critical section (matching a notification to its channel)
/// short.
#[derive(Debug)]
pub struct Subscription<T> {
    id: U256,
    stream: SubscriptionStream,
    client: RpcClient<T>,
}

impl<T: PubsubTransport + Clone + 'static> Subscription<T> {
    /// This subscription's server-assigned id.
    pub fn id(&self) -> U256 {
        self.id
    }

    /// Await the next notification, decoding it as `R`.
    ///
    /// Returns `None` once the subscription's channel closes, which
    /// happens after [`Subscription::close`] or if the transport drops the
    /// connection.
    pub async fn recv<R: DeserializeOwned>(&mut self) -> Option<Result<R, RpcError<TransportErrorKind>>> {
        let raw = self.stream.recv().await?;
        Some(serde_json::from_str(raw.get()).map_err(|err| RpcError::InvalidResponse(err.to_string())))
    }

    /// Remove this subscription's router entry and issue `eth_unsubscribe`
    /// in the background. Further notifications, even if already in
    /// flight, are dropped.
    pub async fn close(self) {
        let _ = self.client.transport().unsubscribe(self.id).await;
        let client = self.client.clone();
        let id = self.id;
        tokio::spawn(async move {
            let _: Result<bool, _> = client.request("eth_unsubscribe", &(id,)).await;
        });
    }
}
