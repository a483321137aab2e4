//! Single requests/responses and batches of them.

use crate::{common::Id, request::Request, response::Response};
use serde::{
    de::{self, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use serde_json::value::RawValue;
use std::{collections::HashSet, fmt};

/// A request, or a batch of requests, ready to be sent as one wire payload.
#[derive(Debug, Clone)]
pub enum RequestPacket {
    /// A single request.
    Single(Request),
    /// A batch of requests, each with a distinct id.
    Batch(Vec<Request>),
}

impl From<Request> for RequestPacket {
    fn from(req: Request) -> Self {
        Self::Single(req)
    }
}

impl FromIterator<Request> for RequestPacket {
    fn from_iter<T: IntoIterator<Item = Request>>(iter: T) -> Self {
        Self::Batch(iter.into_iter().collect())
    }
}

impl Serialize for RequestPacket {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Single(req) => Serialize::serialize(req, serializer),
            Self::Batch(batch) => batch.serialize(serializer),
        }
    }
}

impl RequestPacket {
    /// The number of requests in this packet.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(batch) => batch.len(),
        }
    }

    /// `true` if this packet carries no requests.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All requests in this packet.
    pub fn requests(&self) -> &[Request] {
        match self {
            Self::Single(req) => std::slice::from_ref(req),
            Self::Batch(batch) => batch.as_slice(),
        }
    }

    /// The ids of every `eth_subscribe` request in this packet, used by the
    /// subscription router to recognize the matching response.
    pub fn subscription_request_ids(&self) -> HashSet<Id> {
        self.requests().iter().filter(|req| req.is_subscription()).map(|req| req.id.clone()).collect()
    }
}

/// A response, or a batch of responses, as decoded from one wire payload.
#[derive(Debug, Clone)]
pub enum ResponsePacket {
    /// A single response.
    Single(Response),
    /// A batch of responses. Order is not guaranteed to match the request
    /// batch's order; callers must route by id.
    Batch(Vec<Response>),
}

impl ResponsePacket {
    /// All responses in this packet.
    pub fn responses(&self) -> &[Response] {
        match self {
            Self::Single(resp) => std::slice::from_ref(resp),
            Self::Batch(batch) => batch.as_slice(),
        }
    }

    /// `true` if every response in the packet is a success.
    pub fn is_success(&self) -> bool {
        self.responses().iter().all(Response::is_success)
    }

    /// `true` if at least one response in the packet is an error.
    pub fn is_error(&self) -> bool {
        self.responses().iter().any(Response::is_error)
    }

    /// Find the response carrying the given id, if present.
    pub fn response_by_id(&self, id: &Id) -> Option<&Response> {
        self.responses().iter().find(|resp| &resp.id == id)
    }
}

impl<'de> Deserialize<'de> for ResponsePacket {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PacketVisitor;

        impl<'de> Visitor<'de> for PacketVisitor {
            type Value = ResponsePacket;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON-RPC response object or an array of them")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut responses = Vec::new();
                while let Some(resp) = seq.next_element()? {
                    responses.push(resp);
                }
                Ok(ResponsePacket::Batch(responses))
            }

            fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let resp = Response::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(ResponsePacket::Single(resp))
            }
        }

        deserializer.deserialize_any(PacketVisitor)
    }
}

/// Unused in serialization today, kept for symmetry with [`RequestPacket`]:
/// a bare payload useful when forwarding a response body verbatim.
pub type RawResponse = Box<RawValue>;

#[cfg(test)]
mod tests {
    use super::*;

    fn req(method: &'static str) -> Request {
        Request::new(method, &()).unwrap()
    }

    #[test]
    fn single_packet_serializes_as_object() {
        let packet = RequestPacket::Single(req("eth_blockNumber"));
        let json = serde_json::to_value(&packet).unwrap();
        assert!(json.is_object());
    }

    #[test]
    fn batch_packet_serializes_as_array() {
        let packet: RequestPacket = vec![req("eth_blockNumber"), req("eth_chainId")].into_iter().collect();
        let json = serde_json::to_value(&packet).unwrap();
        assert!(json.is_array());
        assert_eq!(json.as_array().unwrap().len(), 2);
    }

    #[test]
    fn batch_response_is_routed_by_id_not_position() {
        let json = r#"[
            {"jsonrpc":"2.0","id":3,"result":"0xc"},
            {"jsonrpc":"2.0","id":1,"result":"0xa"},
            {"jsonrpc":"2.0","id":2,"result":"0xb"}
        ]"#;
        let packet: ResponsePacket = serde_json::from_str(json).unwrap();
        let two = packet.response_by_id(&Id::Number(2)).unwrap();
        assert_eq!(two.payload.deserialize_success::<String>().unwrap(), "0xb");
    }
}
