//! The RPC error taxonomy: terminal error kinds distinguished from the raw
//! JSON-RPC error object a server returns.

use crate::response::ErrorPayload;
use serde_json::value::RawValue;

/// JSON-RPC error code for "method not found", per the spec.
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Alternative "method not found" codes returned by some nodes that don't
/// follow the spec's code exactly.
pub const METHOD_NOT_FOUND_ALTERNATIVES: [i64; 2] = [-32004, -32000];

/// `true` if `code` indicates the server doesn't implement the called
/// method, under either the standard or an alternative code.
pub fn is_method_not_found(code: i64) -> bool {
    code == METHOD_NOT_FOUND || METHOD_NOT_FOUND_ALTERNATIVES.contains(&code)
}

/// An error produced by a JSON-RPC call, covering both errors the server
/// reported and errors that occurred before or after talking to it.
#[derive(Debug, thiserror::Error)]
pub enum RpcError<E> {
    /// The server answered with a well-formed JSON-RPC error object.
    #[error("server error {}: {}", .0.code, .0.message)]
    ErrorResp(ErrorPayload),

    /// The decoded response had neither `id` matching a pending request,
    /// nor both `result` and `error` absent/present correctly.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A pending request's correlation slot was dropped without ever being
    /// filled, e.g. the transport closed mid-flight.
    #[error("no response received for request")]
    NoResponse,

    /// A call did not complete within its configured deadline.
    #[error("call timed out")]
    CallTimeout,

    /// A call could not be dispatched, or was dispatched but a
    /// non-protocol failure occurred (HTTP error, malformed body, etc).
    #[error("call failed: {0}")]
    CallFailed(String),

    /// The underlying connection was closed.
    #[error("connection closed")]
    ConnectionClosed,

    /// Request serialization failed.
    #[error("serialization error: {0}")]
    SerError(#[source] serde_json::Error),

    /// A transport-level error, opaque to this crate.
    #[error(transparent)]
    Transport(#[from] E),
}

impl<E> RpcError<E> {
    /// Build a [`RpcError::CallFailed`] from an HTTP status and body, per
    /// the non-2xx handling rule: a body that parses as JSON stays JSON, a
    /// body that doesn't becomes the `data` field's plain text.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
            return Self::ErrorResp(payload);
        }
        Self::CallFailed(format!("HTTP {status}: {body}"))
    }

    /// `true` if this is [`RpcError::ErrorResp`] and its code is a
    /// "method not found" code.
    pub fn is_method_not_found(&self) -> bool {
        matches!(self, Self::ErrorResp(payload) if is_method_not_found(payload.code))
    }

    /// The raw error payload's `data` field, if this is an
    /// [`RpcError::ErrorResp`] with one attached.
    pub fn data(&self) -> Option<&RawValue> {
        match self {
            Self::ErrorResp(payload) => payload.data.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("transport broke")]
    struct FakeTransportError;

    #[test]
    fn recognizes_standard_and_alternative_method_not_found_codes() {
        assert!(is_method_not_found(-32601));
        assert!(is_method_not_found(-32004));
        assert!(!is_method_not_found(-32000 - 1));
    }

    #[test]
    fn http_status_with_json_body_becomes_error_resp() {
        let err: RpcError<FakeTransportError> =
            RpcError::from_http_status(400, r#"{"code":-32602,"message":"bad params","data":null}"#);
        assert!(matches!(err, RpcError::ErrorResp(_)));
    }

    #[test]
    fn http_status_with_plain_body_becomes_call_failed() {
        let err: RpcError<FakeTransportError> = RpcError::from_http_status(502, "bad gateway");
        assert!(matches!(err, RpcError::CallFailed(_)));
    }
}
