//! Connect applications to EVM-compatible blockchains over JSON-RPC.
//!
//! This crate is a thin facade over the individual `chainrpc-*` crates,
//! re-exported behind feature flags so a consumer pulls in only the layers
//! it needs: codecs and the typed-transaction model for offline signing,
//! or the full transport-and-provider stack for talking to a node.

#[cfg(feature = "abi")]
#[doc(inline)]
pub use chainrpc_abi as abi;

#[cfg(feature = "consensus")]
#[doc(inline)]
pub use chainrpc_consensus as consensus;

#[cfg(feature = "json-rpc")]
#[doc(inline)]
pub use chainrpc_json_rpc as json_rpc;

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use chainrpc_primitives as primitives;

#[cfg(feature = "provider")]
#[doc(inline)]
pub use chainrpc_provider as provider;

#[cfg(feature = "rlp")]
#[doc(inline)]
pub use chainrpc_rlp as rlp;

#[cfg(feature = "rpc-client")]
#[doc(inline)]
pub use chainrpc_rpc_client as rpc_client;

#[cfg(feature = "rpc-types")]
#[doc(inline)]
pub use chainrpc_rpc_types as rpc_types;

#[cfg(feature = "transport")]
#[doc(inline)]
pub use chainrpc_transport as transport;

#[cfg(feature = "transport-http")]
#[doc(inline)]
pub use chainrpc_transport_http as transport_http;

#[cfg(feature = "transport-ws")]
#[doc(inline)]
pub use chainrpc_transport_ws as transport_ws;

#[cfg(feature = "provider")]
pub use provider::Provider;
