//! JSON-RPC 2.0 framing: requests, responses, batching, the error taxonomy,
//! and Ethereum's non-standard subscription notification format.
//!
//! This crate only models the wire protocol; sending bytes and routing
//! responses to pending callers is a transport's job.

mod common;
pub use common::Id;

mod error;
pub use error::{is_method_not_found, RpcError, METHOD_NOT_FOUND, METHOD_NOT_FOUND_ALTERNATIVES};

mod notification;
pub use notification::{EthNotification, PubSubItem};

mod packet;
pub use packet::{RequestPacket, ResponsePacket};

mod request;
pub use request::{next_id, Request};

mod response;
pub use response::{ErrorPayload, Response, ResponsePayload};

use serde::{de::DeserializeOwned, Serialize};

/// A type usable as JSON-RPC call parameters.
pub trait RpcParam: Serialize + Send + Sync {}
impl<T> RpcParam for T where T: Serialize + Send + Sync {}

/// A type usable as a JSON-RPC call's decoded return value.
pub trait RpcReturn: DeserializeOwned + Send + Sync + 'static {}
impl<T> RpcReturn for T where T: DeserializeOwned + Send + Sync + 'static {}
