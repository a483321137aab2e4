//! Ethereum's non-standard pubsub notification format.
//!
//! `eth_subscribe` notifications arrive as
//! `{"method":"eth_subscription","params":{"subscription":..,"result":..}}`,
//! which is not itself a valid JSON-RPC response or request. A WebSocket
//! transport must tell notifications and responses apart on every inbound
//! frame.

use crate::response::{ErrorPayload, Response, ResponsePayload};
use chainrpc_primitives::U256;
use serde::{
    de::{MapAccess, Visitor},
    Deserialize,
};
use serde_json::value::RawValue;
use std::fmt;

/// One `eth_subscription` notification.
#[derive(Debug, Clone)]
pub struct EthNotification {
    /// The subscription this notification belongs to.
    pub subscription: U256,
    /// The not-yet-deserialized notification payload.
    pub result: Box<RawValue>,
}

/// Either a JSON-RPC [`Response`] or an [`EthNotification`], as received
/// over a pubsub-capable transport.
#[derive(Debug, Clone)]
pub enum PubSubItem {
    /// A response to an outstanding request.
    Response(Response),
    /// An unsolicited subscription notification.
    Notification(EthNotification),
}

impl<'de> Deserialize<'de> for PubSubItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ItemVisitor;

        impl<'de> Visitor<'de> for ItemVisitor {
            type Value = PubSubItem;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON-RPC response or an eth_subscription notification")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut id = None;
                let mut method = None;
                let mut params = None;
                let mut result = None;
                let mut error = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "id" => id = Some(map.next_value()?),
                        "method" => method = Some(map.next_value::<String>()?),
                        "params" => params = Some(map.next_value::<SubscriptionParams>()?),
                        "result" => result = Some(map.next_value()?),
                        "error" => error = Some(map.next_value::<ErrorPayload>()?),
                        _ => {
                            let _: serde::de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                if let Some(id) = id {
                    let payload = match (result, error) {
                        (Some(result), None) => ResponsePayload::Success(result),
                        (None, Some(error)) => ResponsePayload::Failure(error),
                        _ => {
                            return Err(serde::de::Error::custom(
                                "response must carry exactly one of `result`/`error`",
                            ))
                        }
                    };
                    return Ok(PubSubItem::Response(Response { id, payload }));
                }

                if method.as_deref() != Some("eth_subscription") {
                    return Err(serde::de::Error::custom(
                        "notification method must be `eth_subscription`",
                    ));
                }
                let params = params.ok_or_else(|| serde::de::Error::missing_field("params"))?;
                Ok(PubSubItem::Notification(EthNotification {
                    subscription: params.subscription,
                    result: params.result,
                }))
            }
        }

        deserializer.deserialize_map(ItemVisitor)
    }
}

#[derive(Debug, Deserialize)]
struct SubscriptionParams {
    subscription: U256,
    result: Box<RawValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_response() {
        let json = r#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#;
        let item: PubSubItem = serde_json::from_str(json).unwrap();
        assert!(matches!(item, PubSubItem::Response(_)));
    }

    #[test]
    fn decodes_a_subscription_notification() {
        let json = r#"{"jsonrpc":"2.0","method":"eth_subscription","params":{"subscription":"0x9ce59a13059e417087c02d3236a0b1cc","result":{"number":"0x1"}}}"#;
        let item: PubSubItem = serde_json::from_str(json).unwrap();
        match item {
            PubSubItem::Notification(note) => {
                assert_eq!(note.result.get(), r#"{"number":"0x1"}"#);
            }
            PubSubItem::Response(_) => panic!("expected a notification"),
        }
    }
}
