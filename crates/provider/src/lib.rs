//! A typed `eth_*` API surface and the pending-transaction inclusion
//! watcher built on top of [`chainrpc_rpc_client`].

mod pending;
mod provider;

pub use pending::{PendingInclusionError, PendingTransactionConfig};
pub use provider::Provider;
