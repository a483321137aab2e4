//! Solidity ABI v2 tuple encoding and decoding against an explicit type
//! schema, plus the selector/topic and log-decoding helpers built on top of
//! it.

mod codec;
mod error;
mod log;
mod selector;
mod ty;
mod value;

pub use codec::{decode_tuple, encode_tuple, encode_with_prefix};
pub use error::AbiError;
pub use log::{decode_log, EventParam};
pub use selector::{event_topic0, function_selector};
pub use ty::AbiType;
pub use value::{AbiStruct, AbiValue};
