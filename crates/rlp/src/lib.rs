//! Recursive Length Prefix (RLP) encoding and decoding, as specified by the
//! Ethereum Yellow Paper: integers, byte strings, and lists of the same,
//! encoded with a size-precomputing encoder and a forward-reading decoder.

mod decode;
mod encode;
mod error;
mod header;

pub use decode::{Decodable, RlpDecoder};
pub use encode::{encode_to_vec, list_length, Encodable};
pub use error::{RlpError, RlpResult};
pub use header::{length_of_length, Header};
