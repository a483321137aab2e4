//! Inbound JSON-RPC responses.

use crate::common::Id;
use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use serde_json::value::RawValue;
use std::fmt;

/// A JSON-RPC 2.0 error object, as returned in a response's `error` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// The error code.
    pub code: i64,
    /// A short human-readable description.
    #[serde(default)]
    pub message: String,
    /// Node-provided detail, typically raw contract revert bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Box<RawValue>>,
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error {}: {}", self.code, self.message)
    }
}

/// A response's `result`/`error` payload.
#[derive(Debug, Clone)]
pub enum ResponsePayload {
    /// The raw, not-yet-deserialized `result` value.
    Success(Box<RawValue>),
    /// The `error` object.
    Failure(ErrorPayload),
}

impl ResponsePayload {
    /// `true` if this is a success payload.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// `true` if this is an error payload.
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The error payload, if this is a failure.
    pub const fn as_error(&self) -> Option<&ErrorPayload> {
        match self {
            Self::Failure(err) => Some(err),
            Self::Success(_) => None,
        }
    }

    /// Deserialize the success payload as `T`. Fails if this is a failure
    /// payload.
    pub fn deserialize_success<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        match self {
            Self::Success(raw) => serde_json::from_str(raw.get()),
            Self::Failure(err) => Err(serde::de::Error::custom(format!(
                "cannot deserialize an error payload as a success value: {err}"
            ))),
        }
    }
}

/// A single JSON-RPC response object.
#[derive(Debug, Clone)]
pub struct Response {
    /// The id this response is correlated with. `Id::None` for responses
    /// that fail to carry one; such responses cannot be matched to a
    /// pending request and surface as `RpcError::InvalidResponse`.
    pub id: Id,
    /// The response's payload.
    pub payload: ResponsePayload,
}

impl Response {
    /// `true` if the payload is a success.
    pub const fn is_success(&self) -> bool {
        self.payload.is_success()
    }

    /// `true` if the payload is an error.
    pub const fn is_error(&self) -> bool {
        self.payload.is_error()
    }
}

impl Serialize for Response {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("jsonrpc", "2.0")?;
        map.serialize_entry("id", &self.id)?;
        match &self.payload {
            ResponsePayload::Success(result) => map.serialize_entry("result", result)?,
            ResponsePayload::Failure(err) => map.serialize_entry("error", err)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Response {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        enum Field {
            Result,
            Error,
            Id,
            Unknown,
        }

        impl<'de> Deserialize<'de> for Field {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                struct FieldVisitor;
                impl<'de> Visitor<'de> for FieldVisitor {
                    type Value = Field;

                    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        f.write_str("`result`, `error`, or `id`")
                    }

                    fn visit_str<E>(self, value: &str) -> Result<Field, E>
                    where
                        E: serde::de::Error,
                    {
                        Ok(match value {
                            "result" => Field::Result,
                            "error" => Field::Error,
                            "id" => Field::Id,
                            _ => Field::Unknown,
                        })
                    }
                }
                deserializer.deserialize_identifier(FieldVisitor)
            }
        }

        struct ResponseVisitor;

        impl<'de> Visitor<'de> for ResponseVisitor {
            type Value = Response;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON-RPC 2.0 response object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut result: Option<Box<RawValue>> = None;
                let mut error: Option<ErrorPayload> = None;
                let mut id: Option<Id> = None;

                while let Some(key) = map.next_key()? {
                    match key {
                        Field::Result => {
                            if result.is_some() {
                                return Err(serde::de::Error::duplicate_field("result"));
                            }
                            result = Some(map.next_value()?);
                        }
                        Field::Error => {
                            if error.is_some() {
                                return Err(serde::de::Error::duplicate_field("error"));
                            }
                            error = Some(map.next_value()?);
                        }
                        Field::Id => {
                            if id.is_some() {
                                return Err(serde::de::Error::duplicate_field("id"));
                            }
                            id = Some(map.next_value()?);
                        }
                        Field::Unknown => {
                            let _: serde::de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                let payload = match (result, error) {
                    (Some(_), Some(_)) => {
                        return Err(serde::de::Error::custom(
                            "response carries both `result` and `error`",
                        ))
                    }
                    (Some(result), None) => ResponsePayload::Success(result),
                    (None, Some(error)) => ResponsePayload::Failure(error),
                    (None, None) => {
                        return Err(serde::de::Error::custom(
                            "response carries neither `result` nor `error`",
                        ))
                    }
                };

                Ok(Response { id: id.unwrap_or(Id::None), payload })
            }
        }

        deserializer.deserialize_map(ResponseVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_success_response() {
        let json = r#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#;
        let resp: Response = serde_json::from_str(json).unwrap();
        assert_eq!(resp.id, Id::Number(1));
        assert!(resp.is_success());
    }

    #[test]
    fn deserializes_an_error_response() {
        let json = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"method not found"}}"#;
        let resp: Response = serde_json::from_str(json).unwrap();
        assert!(resp.is_error());
        assert_eq!(resp.payload.as_error().unwrap().code, -32601);
    }

    #[test]
    fn rejects_response_with_both_result_and_error() {
        let json = r#"{"jsonrpc":"2.0","id":1,"result":"0x1","error":{"code":-32601,"message":"x"}}"#;
        assert!(serde_json::from_str::<Response>(json).is_err());
    }

    #[test]
    fn rejects_response_with_neither_result_nor_error() {
        let json = r#"{"jsonrpc":"2.0","id":1}"#;
        assert!(serde_json::from_str::<Response>(json).is_err());
    }
}
