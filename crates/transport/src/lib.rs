//! The `Transport` abstraction an RPC client dispatches requests through,
//! and the error taxonomy shared by every concrete transport.

mod error;
pub use error::{TransportError, TransportErrorKind};

mod pubsub;
pub use pubsub::{PubsubTransport, SubscriptionStream};

#[allow(clippy::module_inception)]
mod r#trait;
pub use r#trait::Transport;

pub use chainrpc_json_rpc::RpcError;
