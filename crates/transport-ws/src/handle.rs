//! State shared between the frontend [`crate::WsTransport`] and its
//! background connection task: the correlation map and the subscription
//! router.

use chainrpc_json_rpc::{Id, Response};
use chainrpc_primitives::U256;
use serde_json::value::RawValue;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::sync::{mpsc, oneshot};

/// A pending single request's correlation slot.
pub(crate) type PendingSlot = oneshot::Sender<Response>;

/// A subscription's notification sink.
pub(crate) type SubscriptionSink = mpsc::UnboundedSender<Box<RawValue>>;

/// The correlation map and subscription router, shared via `Arc` between the
/// frontend (which inserts entries before sending a request) and the
/// backend task (which drains inbound frames and dispatches them).
#[derive(Debug, Default)]
pub(crate) struct SharedState {
    pending: Mutex<HashMap<Id, PendingSlot>>,
    subscriptions: Mutex<HashMap<U256, SubscriptionSink>>,
}

impl SharedState {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Install a correlation slot for `id`, to be filled when its response
    /// arrives.
    pub(crate) fn register(&self, id: Id, slot: PendingSlot) {
        self.pending.lock().unwrap().insert(id, slot);
    }

    /// Remove and return the correlation slot for `id`, if one is pending.
    pub(crate) fn take_pending(&self, id: &Id) -> Option<PendingSlot> {
        self.pending.lock().unwrap().remove(id)
    }

    /// Fulfil every pending request with a connection-closed failure; used
    /// when the backend task exits for good.
    pub(crate) fn fail_all_pending(&self) {
        self.pending.lock().unwrap().clear();
    }

    /// Install a subscription router entry, to be filled with notifications
    /// as they arrive.
    pub(crate) fn install_subscription(&self, sub_id: U256, sink: SubscriptionSink) {
        self.subscriptions.lock().unwrap().insert(sub_id, sink);
    }

    /// Remove a subscription's router entry. Returns `true` if one existed.
    pub(crate) fn remove_subscription(&self, sub_id: &U256) -> bool {
        self.subscriptions.lock().unwrap().remove(sub_id).is_some()
    }

    /// Route a notification to its subscription's sink, dropping it
    /// silently if no consumer is registered (e.g. it unsubscribed in the
    /// middle of an in-flight notification).
    pub(crate) fn route_notification(&self, sub_id: U256, payload: Box<RawValue>) {
        let subs = self.subscriptions.lock().unwrap();
        if let Some(sink) = subs.get(&sub_id) {
            let _ = sink.send(payload);
        }
    }
}
