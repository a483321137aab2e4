//! A transport-agnostic JSON-RPC client: single calls, batches, and
//! `eth_subscribe`-based subscriptions.

mod batch;
mod client;
mod subscription;

pub use batch::{Batch, BatchCall, BatchResponse};
pub use client::RpcClient;
pub use subscription::Subscription;

pub use chainrpc_json_rpc::RpcError;
pub use chainrpc_transport::TransportErrorKind;
