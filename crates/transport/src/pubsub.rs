//! The extra surface a subscription-capable transport exposes, on top of
//! plain request/response [`Transport`].

use crate::{Transport, TransportError};
use async_trait::async_trait;
use chainrpc_primitives::U256;
use serde_json::value::RawValue;
use tokio::sync::mpsc;

/// A stream of not-yet-deserialized notification payloads for one active
/// subscription.
pub type SubscriptionStream = mpsc::UnboundedReceiver<Box<RawValue>>;

/// A transport that can maintain server-push subscriptions alongside
/// ordinary request/response calls.
///
/// Implementors install a router entry mapping the server-assigned
/// subscription id to a channel before the `eth_subscribe` call that created
/// it returns; [`unsubscribe`](PubsubTransport::unsubscribe) tears that
/// entry down and asynchronously notifies the server.
#[async_trait]
pub trait PubsubTransport: Transport {
    /// Register interest in `subscription_id`, returning the channel its
    /// notifications will be pushed to as they arrive.
    async fn subscribe(&self, subscription_id: U256) -> Result<SubscriptionStream, TransportError>;

    /// Remove a subscription's router entry and issue `eth_unsubscribe` in
    /// the background.
    async fn unsubscribe(&self, subscription_id: U256) -> Result<(), TransportError>;
}
