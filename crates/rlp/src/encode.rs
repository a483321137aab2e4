use crate::header::{length_of_length, Header};
use bytes::BufMut;
use chainrpc_primitives::{Address, Bloom, Bytes, Hash, TxKind, U256};

/// A value that can be RLP-encoded.
///
/// Implementors must make `length` agree exactly with the number of bytes
/// `encode` writes: the encoder is built from a pre-computed size budget,
/// and under- or over-filling it is a programmer error.
pub trait Encodable {
    /// The total number of bytes `encode` will write for this value.
    fn length(&self) -> usize;

    /// Writes the RLP encoding of this value to `out`.
    fn encode(&self, out: &mut dyn BufMut);
}

fn encode_bytes_string(bytes: &[u8], out: &mut dyn BufMut) {
    if bytes.len() == 1 && bytes[0] < 0x80 {
        out.put_u8(bytes[0]);
        return;
    }
    Header { list: false, payload_length: bytes.len() }.encode(out);
    out.put_slice(bytes);
}

fn string_length(len: usize) -> usize {
    if len == 1 {
        // the single-byte special case is resolved by the caller checking
        // the byte value, but worst case it still costs 1 header byte.
        1
    } else {
        Header { list: false, payload_length: len }.length() + len
    }
}

impl Encodable for [u8] {
    fn length(&self) -> usize {
        if self.len() == 1 && self[0] < 0x80 {
            1
        } else {
            Header { list: false, payload_length: self.len() }.length() + self.len()
        }
    }

    fn encode(&self, out: &mut dyn BufMut) {
        encode_bytes_string(self, out);
    }
}

impl Encodable for Bytes {
    fn length(&self) -> usize {
        self.as_slice().length()
    }
    fn encode(&self, out: &mut dyn BufMut) {
        self.as_slice().encode(out)
    }
}

impl Encodable for Vec<u8> {
    fn length(&self) -> usize {
        self.as_slice().length()
    }
    fn encode(&self, out: &mut dyn BufMut) {
        self.as_slice().encode(out)
    }
}

macro_rules! impl_encodable_for_fixed {
    ($ty:ty, $n:expr) => {
        impl Encodable for $ty {
            fn length(&self) -> usize {
                string_length($n)
            }
            fn encode(&self, out: &mut dyn BufMut) {
                self.as_slice().encode(out)
            }
        }
    };
}

impl_encodable_for_fixed!(Address, 20);
impl_encodable_for_fixed!(Hash, 32);
impl_encodable_for_fixed!(Bloom, 256);

fn trimmed_be(bytes: &[u8]) -> &[u8] {
    let first_nonzero = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[first_nonzero..]
}

macro_rules! impl_encodable_for_uint {
    ($($ty:ty),*) => {
        $(
            impl Encodable for $ty {
                fn length(&self) -> usize {
                    let be = self.to_be_bytes();
                    let trimmed = trimmed_be(&be);
                    if trimmed.is_empty() {
                        1
                    } else {
                        trimmed.length()
                    }
                }

                fn encode(&self, out: &mut dyn BufMut) {
                    let be = self.to_be_bytes();
                    let trimmed = trimmed_be(&be);
                    if trimmed.is_empty() {
                        out.put_u8(0x80);
                    } else {
                        trimmed.encode(out);
                    }
                }
            }
        )*
    };
}

impl_encodable_for_uint!(u8, u16, u32, u64, u128);

impl Encodable for U256 {
    fn length(&self) -> usize {
        let be = self.to_be_bytes::<32>();
        let trimmed = trimmed_be(&be);
        if trimmed.is_empty() {
            1
        } else {
            trimmed.length()
        }
    }

    fn encode(&self, out: &mut dyn BufMut) {
        let be = self.to_be_bytes::<32>();
        let trimmed = trimmed_be(&be);
        if trimmed.is_empty() {
            out.put_u8(0x80);
        } else {
            trimmed.encode(out);
        }
    }
}

impl Encodable for TxKind {
    fn length(&self) -> usize {
        match self {
            Self::Create => 1,
            Self::Call(addr) => addr.length(),
        }
    }

    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            Self::Create => out.put_u8(0x80),
            Self::Call(addr) => addr.encode(out),
        }
    }
}

impl<T: Encodable> Encodable for Vec<T>
where
    T: Encodable,
{
    fn length(&self) -> usize {
        let payload_length: usize = self.iter().map(Encodable::length).sum();
        Header { list: true, payload_length }.length() + payload_length
    }

    fn encode(&self, out: &mut dyn BufMut) {
        let payload_length: usize = self.iter().map(Encodable::length).sum();
        Header { list: true, payload_length }.encode(out);
        for item in self {
            item.encode(out);
        }
    }
}

impl<T: Encodable> Encodable for &T {
    fn length(&self) -> usize {
        (**self).length()
    }
    fn encode(&self, out: &mut dyn BufMut) {
        (**self).encode(out)
    }
}

/// Returns the total RLP-encoded length of a list whose children have the
/// given combined payload length.
pub fn list_length(payload_length: usize) -> usize {
    Header { list: true, payload_length }.length() + payload_length
}

/// Encodes an exact-size buffer and panics (in debug) if the caller's
/// length budget didn't match what was written.
pub fn encode_to_vec<T: Encodable + ?Sized>(value: &T) -> Vec<u8> {
    let len = value.length();
    let mut out = Vec::with_capacity(len);
    value.encode(&mut out);
    debug_assert_eq!(out.len(), len, "Encodable::length() disagreed with encode()");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Decodable;

    #[test]
    fn zero_is_empty_string() {
        let v = U256::from(0u64);
        let mut buf = Vec::new();
        v.encode(&mut buf);
        assert_eq!(buf, vec![0x80]);
        assert_eq!(v.length(), 1);
    }

    #[test]
    fn small_byte_is_itself() {
        let v: u64 = 0x42;
        let mut buf = Vec::new();
        v.encode(&mut buf);
        assert_eq!(buf, vec![0x42]);
    }

    #[test]
    fn gas_example() {
        let v: u64 = 21000;
        let buf = encode_to_vec(&v);
        assert_eq!(buf, vec![0x82, 0x52, 0x08]);
        let mut slice = buf.as_slice();
        let decoded = u64::decode(&mut slice).unwrap();
        assert_eq!(decoded, 21000);
    }

    #[test]
    fn list_of_strings() {
        let items: Vec<Vec<u8>> = vec![b"cat".to_vec(), b"dog".to_vec()];
        let buf = encode_to_vec(&items);
        assert_eq!(buf, vec![0xc8, 0x83, b'c', b'a', b't', 0x83, b'd', b'o', b'g']);
    }
}
