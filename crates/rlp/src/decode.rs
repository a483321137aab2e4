use crate::{
    error::{RlpError, RlpResult},
    header::Header,
};
use chainrpc_primitives::{Address, Bloom, Bytes, Hash, TxKind, U256};

/// A value that can be decoded from the front of an RLP byte buffer.
///
/// Decoding is forward-only: implementors consume exactly their own
/// encoding from `buf` and leave the rest for the next decode call.
pub trait Decodable: Sized {
    /// Decodes `Self` from the front of `buf`, advancing it.
    fn decode(buf: &mut &[u8]) -> RlpResult<Self>;

    /// Like [`decode`](Self::decode), but returns `None` on any error
    /// instead of propagating it, leaving `buf` in an unspecified state.
    fn decode_or_none(buf: &mut &[u8]) -> Option<Self> {
        Self::decode(buf).ok()
    }
}

fn decode_string<'a>(buf: &mut &'a [u8]) -> RlpResult<&'a [u8]> {
    let &first = buf.first().ok_or(RlpError::InputTooShort)?;
    if first < 0x80 {
        let byte = &buf[..1];
        *buf = &buf[1..];
        return Ok(byte);
    }
    let header = Header::decode(buf)?;
    if header.list {
        return Err(RlpError::UnexpectedList);
    }
    if buf.len() < header.payload_length {
        return Err(RlpError::InputTooShort);
    }
    let (payload, rest) = buf.split_at(header.payload_length);
    *buf = rest;
    Ok(payload)
}

impl Decodable for Vec<u8> {
    fn decode(buf: &mut &[u8]) -> RlpResult<Self> {
        decode_string(buf).map(|s| s.to_vec())
    }
}

impl Decodable for Bytes {
    fn decode(buf: &mut &[u8]) -> RlpResult<Self> {
        Vec::<u8>::decode(buf).map(Into::into)
    }
}

macro_rules! impl_decodable_for_fixed {
    ($ty:ty, $n:expr, $ctor:expr) => {
        impl Decodable for $ty {
            fn decode(buf: &mut &[u8]) -> RlpResult<Self> {
                let payload = decode_string(buf)?;
                if payload.len() != $n {
                    return Err(RlpError::UnexpectedLength { expected: $n, got: payload.len() });
                }
                let mut arr = [0u8; $n];
                arr.copy_from_slice(payload);
                Ok($ctor(arr))
            }
        }
    };
}

impl_decodable_for_fixed!(Address, 20, Address::new);
impl_decodable_for_fixed!(Hash, 32, Hash::new);
impl_decodable_for_fixed!(Bloom, 256, Bloom::new);

fn check_no_leading_zero(bytes: &[u8]) -> RlpResult<()> {
    if bytes.first() == Some(&0) {
        Err(RlpError::LeadingZero)
    } else {
        Ok(())
    }
}

macro_rules! impl_decodable_for_uint {
    ($($ty:ty),*) => {
        $(
            impl Decodable for $ty {
                fn decode(buf: &mut &[u8]) -> RlpResult<Self> {
                    let payload = decode_string(buf)?;
                    check_no_leading_zero(payload)?;
                    if payload.len() > core::mem::size_of::<$ty>() {
                        return Err(RlpError::Overflow);
                    }
                    let mut value: $ty = 0;
                    for &b in payload {
                        value = (value << 8) | b as $ty;
                    }
                    Ok(value)
                }
            }
        )*
    };
}

impl_decodable_for_uint!(u8, u16, u32, u64, u128);

impl Decodable for U256 {
    fn decode(buf: &mut &[u8]) -> RlpResult<Self> {
        let payload = decode_string(buf)?;
        check_no_leading_zero(payload)?;
        if payload.len() > 32 {
            return Err(RlpError::Overflow);
        }
        Ok(U256::from_be_slice(payload))
    }
}

impl Decodable for TxKind {
    fn decode(buf: &mut &[u8]) -> RlpResult<Self> {
        if buf.first() == Some(&0x80) {
            *buf = &buf[1..];
            return Ok(Self::Create);
        }
        Address::decode(buf).map(Self::Call)
    }
}

impl<T: Decodable> Decodable for Vec<T> {
    fn decode(buf: &mut &[u8]) -> RlpResult<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(RlpError::UnexpectedString);
        }
        if buf.len() < header.payload_length {
            return Err(RlpError::InputTooShort);
        }
        let (mut payload, rest) = buf.split_at(header.payload_length);
        let mut out = Vec::new();
        while !payload.is_empty() {
            out.push(T::decode(&mut payload)?);
        }
        *buf = rest;
        Ok(out)
    }
}

/// A forward-reading cursor over an RLP byte buffer, with helpers for
/// decoding heterogeneous lists field-by-field.
pub struct RlpDecoder<'a> {
    buf: &'a [u8],
}

impl<'a> RlpDecoder<'a> {
    /// Wraps a byte slice for decoding.
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Returns `true` if every byte has been consumed.
    pub fn is_done(&self) -> bool {
        self.buf.is_empty()
    }

    /// Peeks at the next byte without consuming it.
    pub fn peek_byte(&self) -> RlpResult<u8> {
        self.buf.first().copied().ok_or(RlpError::InputTooShort)
    }

    /// Returns `true` if the next item is a list (as opposed to a string).
    pub fn is_next_element_list(&self) -> RlpResult<bool> {
        Ok(self.peek_byte()? >= 0xc0)
    }

    /// Decodes the next value of type `T`.
    pub fn decode<T: Decodable>(&mut self) -> RlpResult<T> {
        T::decode(&mut self.buf)
    }

    /// Like [`decode`](Self::decode), returning `None` on any error instead
    /// of propagating it.
    pub fn decode_or_none<T: Decodable>(&mut self) -> Option<T> {
        T::decode(&mut self.buf).ok()
    }

    /// Enters a nested list, running `body` with a sub-decoder scoped to
    /// exactly the list's payload, then verifies the body consumed it all.
    pub fn decode_list<T>(
        &mut self,
        body: impl FnOnce(&mut RlpDecoder<'_>) -> RlpResult<T>,
    ) -> RlpResult<T> {
        let header = Header::decode(&mut self.buf)?;
        if !header.list {
            return Err(RlpError::UnexpectedString);
        }
        if self.buf.len() < header.payload_length {
            return Err(RlpError::InputTooShort);
        }
        let (payload, rest) = self.buf.split_at(header.payload_length);
        let mut inner = RlpDecoder::new(payload);
        let result = body(&mut inner)?;
        if !inner.is_done() {
            return Err(RlpError::ListLengthMismatch {
                expected: header.payload_length,
                got: header.payload_length - inner.buf.len(),
            });
        }
        self.buf = rest;
        Ok(result)
    }

    /// Decodes the remaining buffer as a flat, homogeneous list of `T`
    /// (i.e. `Vec<T>`'s own encoding, not a list-of-lists).
    pub fn decode_as_list<T: Decodable>(&mut self) -> RlpResult<Vec<T>> {
        Vec::<T>::decode(&mut self.buf)
    }

    /// Returns the remaining, undecoded bytes.
    pub fn remaining(&self) -> &'a [u8] {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::Encodable;

    #[test]
    fn round_trip_uint() {
        for v in [0u64, 1, 127, 128, 255, 256, 21000, u64::MAX] {
            let mut buf = Vec::new();
            v.encode(&mut buf);
            let mut slice = buf.as_slice();
            assert_eq!(u64::decode(&mut slice).unwrap(), v);
            assert!(slice.is_empty());
        }
    }

    #[test]
    fn rejects_leading_zero() {
        // 0x82 0x00 0x01 -- a 2-byte string "0001", which has a leading zero.
        let bytes = [0x82, 0x00, 0x01];
        let mut slice = &bytes[..];
        assert_eq!(u64::decode(&mut slice), Err(RlpError::LeadingZero));
    }

    #[test]
    fn list_helpers() {
        let items: Vec<u64> = vec![1, 2, 3];
        let mut buf = Vec::new();
        items.encode(&mut buf);

        let mut dec = RlpDecoder::new(&buf);
        let decoded: Vec<u64> = dec
            .decode_list(|inner| {
                let mut out = Vec::new();
                while !inner.is_done() {
                    out.push(inner.decode::<u64>()?);
                }
                Ok(out)
            })
            .unwrap();
        assert_eq!(decoded, items);
        assert!(dec.is_done());
    }

    #[test]
    fn never_reads_past_declared_length() {
        // Two concatenated items; decoding the first must not touch the second.
        let mut buf = Vec::new();
        1u64.encode(&mut buf);
        2u64.encode(&mut buf);
        let mut slice = buf.as_slice();
        assert_eq!(u64::decode(&mut slice).unwrap(), 1);
        assert_eq!(u64::decode(&mut slice).unwrap(), 2);
        assert!(slice.is_empty());
    }
}
