//! Errors a transport can raise, distinct from the JSON-RPC error taxonomy a
//! well-behaved server speaks.

use chainrpc_json_rpc::{Id, RpcError};

/// An error produced by a concrete transport, independent of whether the
/// server it's talking to ever answered.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TransportErrorKind {
    /// A batch response was missing an entry for a request with this id.
    #[error("missing response for request with id {0:?}")]
    MissingBatchResponse(Id),

    /// The background connection task has stopped; no further requests can
    /// be serviced.
    #[error("transport connection task has stopped")]
    BackendGone,

    /// A subscription was requested on a transport that doesn't support
    /// them (e.g. plain HTTP).
    #[error("subscriptions are not available on this transport")]
    SubscriptionsUnavailable,

    /// An HTTP response carried a non-2xx status.
    #[error("HTTP error {status}: {body}")]
    HttpError {
        /// The HTTP status code.
        status: u16,
        /// The response body, or a synthesized message if it couldn't be
        /// read.
        body: String,
    },

    /// A WebSocket connection attempt, or an established connection, failed.
    #[error("websocket error: {0}")]
    WebSocket(String),

    /// A call did not complete before its deadline.
    #[error("call timed out")]
    Timeout,

    /// Any other transport-level failure.
    #[error("{0}")]
    Custom(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl TransportErrorKind {
    /// Build a [`TransportError`] from a custom error.
    pub fn custom(err: impl std::error::Error + Send + Sync + 'static) -> TransportError {
        RpcError::Transport(Self::Custom(Box::new(err)))
    }

    /// Build a [`TransportError`] from a custom message.
    pub fn custom_str(msg: impl Into<String>) -> TransportError {
        RpcError::Transport(Self::Custom(msg.into().into()))
    }

    /// Build a [`TransportError::MissingBatchResponse`] error.
    pub fn missing_batch_response(id: Id) -> TransportError {
        RpcError::Transport(Self::MissingBatchResponse(id))
    }

    /// Build a [`TransportError::BackendGone`] error.
    pub fn backend_gone() -> TransportError {
        RpcError::Transport(Self::BackendGone)
    }

    /// Build a [`TransportError::Timeout`] error.
    pub fn timeout() -> TransportError {
        RpcError::Transport(Self::Timeout)
    }
}

/// A transport error: either one of the [`TransportErrorKind`] variants, or
/// a well-formed JSON-RPC error the server itself returned.
pub type TransportError = RpcError<TransportErrorKind>;
