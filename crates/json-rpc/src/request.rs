//! Outbound JSON-RPC requests and the process-wide id counter.

use crate::common::Id;
use serde::{ser::SerializeMap, Serialize};
use serde_json::value::RawValue;
use std::sync::atomic::{AtomicU64, Ordering};

/// A single process-wide monotonically increasing counter, shared by every
/// client, from which request ids are drawn.
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Draw the next request id from the shared counter.
pub fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A fully serialized JSON-RPC request, ready to be sent over a transport.
///
/// `params` has already been rendered to JSON so the request can be held in
/// a correlation map and moved between tasks without re-serializing.
#[derive(Debug, Clone)]
pub struct Request {
    /// The method name.
    pub method: &'static str,
    /// The pre-serialized parameters, a JSON array (or `null` for no
    /// parameters).
    pub params: Box<RawValue>,
    /// The request id.
    pub id: Id,
}

impl Request {
    /// Build a request for `method`, serializing `params` and drawing a
    /// fresh id from the shared counter.
    pub fn new<P: Serialize>(method: &'static str, params: &P) -> serde_json::Result<Self> {
        Ok(Self { method, params: serde_json::value::to_raw_value(params)?, id: Id::Number(next_id()) })
    }

    /// `true` if this request's method is `eth_subscribe`.
    pub fn is_subscription(&self) -> bool {
        self.method == "eth_subscribe"
    }

    /// Serialize this request to a boxed [`RawValue`].
    pub fn serialize(&self) -> serde_json::Result<Box<RawValue>> {
        serde_json::value::to_raw_value(self)
    }
}

impl Serialize for Request {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("jsonrpc", "2.0")?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("method", self.method)?;
        map.serialize_entry("params", &self.params)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_distinct() {
        let a = Request::new("eth_blockNumber", &()).unwrap();
        let b = Request::new("eth_blockNumber", &()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn injects_literal_jsonrpc_version() {
        let req = Request::new("eth_chainId", &()).unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["method"], "eth_chainId");
    }

    #[test]
    fn subscription_requests_are_flagged() {
        let req = Request::new("eth_subscribe", &["newHeads"]).unwrap();
        assert!(req.is_subscription());
    }
}
