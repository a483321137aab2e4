use crate::{error::AbiError, ty::AbiType, value::AbiValue};
use chainrpc_primitives::{Address, Bytes, U256};

const WORD: usize = 32;

fn pad32_left(bytes: &[u8]) -> [u8; WORD] {
    let mut out = [0u8; WORD];
    out[WORD - bytes.len()..].copy_from_slice(bytes);
    out
}

fn pad_right_to_word(bytes: &[u8]) -> Vec<u8> {
    let padded_len = bytes.len().div_ceil(WORD) * WORD;
    let mut out = vec![0u8; padded_len.max(WORD)];
    out[..bytes.len()].copy_from_slice(bytes);
    out
}

fn repeat_type(n: usize, ty: &AbiType) -> Vec<AbiType> {
    std::iter::repeat(ty.clone()).take(n).collect()
}

fn check_type(ty: &AbiType, value: &AbiValue) -> Result<(), AbiError> {
    let ok = match (ty, value) {
        (AbiType::Address, AbiValue::Address(_)) => true,
        (AbiType::Bool, AbiValue::Bool(_)) => true,
        (AbiType::FixedBytes(n), AbiValue::FixedBytes(b)) => b.len() == *n as usize,
        (AbiType::Bytes, AbiValue::Bytes(_)) => true,
        (AbiType::String, AbiValue::String(_)) => true,
        (AbiType::UInt(bits), AbiValue::UInt(_, vbits)) => bits == vbits,
        (AbiType::Int(bits), AbiValue::Int(_, vbits)) => bits == vbits,
        (AbiType::FixedArray(n, _), AbiValue::FixedArray(items)) => items.len() == *n,
        (AbiType::Array(_), AbiValue::Array(_)) => true,
        (AbiType::Tuple(fields), AbiValue::Tuple(items)) => fields.len() == items.len(),
        (AbiType::Struct { fields, .. }, AbiValue::Tuple(items)) => fields.len() == items.len(),
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(AbiError::TypeMismatch(format!("expected {ty}, got {value:?}")))
    }
}

/// Encodes `value` as a static 32-byte-aligned word sequence.
///
/// Only valid for types where [`AbiType::is_static`] is `true`.
fn encode_static(ty: &AbiType, value: &AbiValue) -> Result<Vec<u8>, AbiError> {
    check_type(ty, value)?;
    Ok(match (ty, value) {
        (AbiType::Address, AbiValue::Address(addr)) => pad32_left(addr.as_slice()).to_vec(),
        (AbiType::Bool, AbiValue::Bool(b)) => {
            let mut w = [0u8; WORD];
            w[WORD - 1] = *b as u8;
            w.to_vec()
        }
        (AbiType::FixedBytes(_), AbiValue::FixedBytes(bytes)) => {
            let mut w = [0u8; WORD];
            w[..bytes.len()].copy_from_slice(bytes);
            w.to_vec()
        }
        (AbiType::UInt(_), AbiValue::UInt(v, _)) | (AbiType::Int(_), AbiValue::Int(v, _)) => {
            v.to_be_bytes::<WORD>().to_vec()
        }
        (AbiType::FixedArray(n, inner), AbiValue::FixedArray(items)) => {
            encode_tuple(&repeat_type(*n, inner), items)?
        }
        (AbiType::Tuple(fields), AbiValue::Tuple(items))
        | (AbiType::Struct { fields, .. }, AbiValue::Tuple(items)) => {
            encode_tuple(fields, items)?
        }
        _ => unreachable!("check_type already validated the pairing"),
    })
}

/// Encodes `value`'s dynamic payload (the bytes that go in the tail region
/// once a pointer to them has been written in the head).
fn encode_dynamic(ty: &AbiType, value: &AbiValue) -> Result<Vec<u8>, AbiError> {
    check_type(ty, value)?;
    Ok(match (ty, value) {
        (AbiType::Bytes, AbiValue::Bytes(bytes)) => {
            let mut out = pad32_left(&(bytes.len() as u128).to_be_bytes()[16..]).to_vec();
            out.extend(pad_right_to_word(bytes.as_slice()));
            out
        }
        (AbiType::String, AbiValue::String(s)) => {
            let mut out = pad32_left(&(s.len() as u128).to_be_bytes()[16..]).to_vec();
            out.extend(pad_right_to_word(s.as_bytes()));
            out
        }
        (AbiType::Array(inner), AbiValue::Array(items)) => {
            let mut out = pad32_left(&(items.len() as u128).to_be_bytes()[16..]).to_vec();
            out.extend(encode_tuple(&repeat_type(items.len(), inner), items)?);
            out
        }
        (AbiType::FixedArray(n, inner), AbiValue::FixedArray(items)) => {
            encode_tuple(&repeat_type(*n, inner), items)?
        }
        (AbiType::Tuple(fields), AbiValue::Tuple(items))
        | (AbiType::Struct { fields, .. }, AbiValue::Tuple(items)) => {
            encode_tuple(fields, items)?
        }
        _ => unreachable!("check_type already validated the pairing"),
    })
}

/// Encodes a tuple against its type schema using the head/tail layout:
/// static slots (or full static aggregates) are written directly into the
/// head; each dynamic slot gets a 32-byte offset (from the start of this
/// tuple's own encoding) and its payload is appended to the tail.
pub fn encode_tuple(types: &[AbiType], values: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
    if types.len() != values.len() {
        return Err(AbiError::TypeMismatch(format!(
            "expected {} values, got {}",
            types.len(),
            values.len()
        )));
    }

    let head_size: usize = types.iter().map(|t| t.head_words() * WORD).sum();
    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for (ty, value) in types.iter().zip(values) {
        if ty.is_static() {
            head.extend(encode_static(ty, value)?);
        } else {
            let offset = head_size + tail.len();
            head.extend(pad32_left(&(offset as u128).to_be_bytes()[16..]));
            tail.extend(encode_dynamic(ty, value)?);
        }
    }

    head.extend(tail);
    Ok(head)
}

/// Encodes a function call: the 4-byte selector followed by the ABI-encoded
/// argument tuple.
pub fn encode_with_prefix(
    selector: [u8; 4],
    types: &[AbiType],
    values: &[AbiValue],
) -> Result<Bytes, AbiError> {
    let mut out = selector.to_vec();
    out.extend(encode_tuple(types, values)?);
    Ok(out.into())
}

struct Cursor<'a> {
    data: &'a [u8],
}

impl<'a> Cursor<'a> {
    fn word_at(&self, offset: usize) -> Result<&'a [u8], AbiError> {
        self.data
            .get(offset..offset + WORD)
            .ok_or(AbiError::InputTooShort("32-byte word"))
    }

    fn slice_at(&self, offset: usize, len: usize) -> Result<&'a [u8], AbiError> {
        self.data.get(offset..offset + len).ok_or(AbiError::InputTooShort("payload"))
    }
}

/// Tracks the byte ranges claimed by a tuple's own head and by each dynamic
/// element's tail payload, rejecting a new claim that overlaps one already
/// made.
///
/// A tuple's head is always contiguous and positionally fixed by its type
/// schema, so it never overlaps itself; the thing worth policing is a
/// dynamic pointer that aliases the head or another element's tail, which a
/// crafted (or corrupt) encoding could otherwise get away with.
#[derive(Default)]
struct Coverage {
    ranges: Vec<(usize, usize)>,
}

impl Coverage {
    fn claim(&mut self, start: usize, end: usize) -> Result<(), AbiError> {
        if self.ranges.iter().any(|&(s, e)| start < e && s < end) {
            return Err(AbiError::OverlappingRegion { start, end });
        }
        self.ranges.push((start, end));
        Ok(())
    }

    fn total_claimed(&self) -> usize {
        self.ranges.iter().map(|&(s, e)| e - s).sum()
    }
}

fn decode_static(
    ty: &AbiType,
    cur: &Cursor<'_>,
    offset: usize,
    coverage: &mut Coverage,
) -> Result<AbiValue, AbiError> {
    Ok(match ty {
        AbiType::Address => {
            let word = cur.word_at(offset)?;
            AbiValue::Address(Address::try_from_slice(&word[12..]).expect("slice is 20 bytes"))
        }
        AbiType::Bool => {
            let word = cur.word_at(offset)?;
            AbiValue::Bool(word[WORD - 1] != 0)
        }
        AbiType::FixedBytes(n) => {
            let word = cur.word_at(offset)?;
            AbiValue::FixedBytes(word[..*n as usize].to_vec())
        }
        AbiType::UInt(bits) => AbiValue::UInt(U256::from_be_slice(cur.word_at(offset)?), *bits),
        AbiType::Int(bits) => AbiValue::Int(U256::from_be_slice(cur.word_at(offset)?), *bits),
        AbiType::FixedArray(n, inner) => {
            // Embedded directly in the enclosing head, already claimed as
            // part of it: no separate claim here.
            let items = decode_tuple_words(&repeat_type(*n, inner), cur, offset, coverage, false)?;
            AbiValue::FixedArray(items)
        }
        AbiType::Tuple(fields) => {
            AbiValue::Tuple(decode_tuple_words(fields, cur, offset, coverage, false)?)
        }
        AbiType::Struct { fields, .. } => {
            AbiValue::Tuple(decode_tuple_words(fields, cur, offset, coverage, false)?)
        }
        AbiType::Bytes | AbiType::String | AbiType::Array(_) => {
            unreachable!("dynamic type routed through decode_static")
        }
    })
}

fn decode_dynamic(
    ty: &AbiType,
    cur: &Cursor<'_>,
    payload_offset: usize,
    coverage: &mut Coverage,
) -> Result<AbiValue, AbiError> {
    Ok(match ty {
        AbiType::Bytes => {
            let len = read_length(cur, payload_offset)?;
            coverage.claim(payload_offset, payload_offset + WORD)?;
            let bytes = cur.slice_at(payload_offset + WORD, len)?;
            let padded_end = payload_offset + WORD + pad_right_to_word(bytes).len();
            coverage.claim(payload_offset + WORD, padded_end)?;
            AbiValue::Bytes(bytes.to_vec().into())
        }
        AbiType::String => {
            let len = read_length(cur, payload_offset)?;
            coverage.claim(payload_offset, payload_offset + WORD)?;
            let bytes = cur.slice_at(payload_offset + WORD, len)?;
            let padded_end = payload_offset + WORD + pad_right_to_word(bytes).len();
            coverage.claim(payload_offset + WORD, padded_end)?;
            let s = String::from_utf8(bytes.to_vec())
                .map_err(|_| AbiError::TypeMismatch("string payload is not valid utf-8".into()))?;
            AbiValue::String(s)
        }
        AbiType::Array(inner) => {
            let len = read_length(cur, payload_offset)?;
            coverage.claim(payload_offset, payload_offset + WORD)?;
            let items =
                decode_tuple_words(&repeat_type(len, inner), cur, payload_offset + WORD, coverage, true)?;
            AbiValue::Array(items)
        }
        AbiType::FixedArray(n, inner) => AbiValue::FixedArray(decode_tuple_words(
            &repeat_type(*n, inner),
            cur,
            payload_offset,
            coverage,
            true,
        )?),
        AbiType::Tuple(fields) => {
            AbiValue::Tuple(decode_tuple_words(fields, cur, payload_offset, coverage, true)?)
        }
        AbiType::Struct { fields, .. } => {
            AbiValue::Tuple(decode_tuple_words(fields, cur, payload_offset, coverage, true)?)
        }
        _ => unreachable!("static type routed through decode_dynamic"),
    })
}

fn read_length(cur: &Cursor<'_>, offset: usize) -> Result<usize, AbiError> {
    let word = cur.word_at(offset)?;
    if word[..WORD - 8].iter().any(|&b| b != 0) {
        return Err(AbiError::TypeMismatch("length prefix overflows usize".into()));
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[WORD - 8..]);
    Ok(u64::from_be_bytes(buf) as usize)
}

/// Decodes a tuple whose head begins at `base` within `cur.data`, where
/// dynamic offsets are relative to `base` (this is the recursive case used
/// both at the top level and for nested tuples/arrays).
///
/// `claim_head` is `false` for a static aggregate (a `Tuple`/`FixedArray`
/// embedded directly in an enclosing head, whose bytes are already claimed
/// as part of that head) and `true` everywhere else: the top-level call and
/// every aggregate reached by following a dynamic pointer, each of which
/// owns a genuinely separate region of the buffer.
fn decode_tuple_words(
    types: &[AbiType],
    cur: &Cursor<'_>,
    base: usize,
    coverage: &mut Coverage,
    claim_head: bool,
) -> Result<Vec<AbiValue>, AbiError> {
    let head_size: usize = types.iter().map(|t| t.head_words() * WORD).sum();
    if base + head_size > cur.data.len() {
        return Err(AbiError::OffsetOutOfBounds { offset: base + head_size, len: cur.data.len() });
    }
    if claim_head {
        coverage.claim(base, base + head_size)?;
    }

    let mut out = Vec::with_capacity(types.len());
    let mut head_cursor = base;
    for ty in types {
        if ty.is_static() {
            out.push(decode_static(ty, cur, head_cursor, coverage)?);
            head_cursor += ty.head_words() * WORD;
        } else {
            let rel_offset = read_length(cur, head_cursor)?;
            let abs_offset = base + rel_offset;
            if abs_offset > cur.data.len() || abs_offset < base + head_size {
                return Err(AbiError::OffsetOutOfBounds { offset: abs_offset, len: cur.data.len() });
            }
            out.push(decode_dynamic(ty, cur, abs_offset, coverage)?);
            head_cursor += WORD;
        }
    }
    Ok(out)
}

/// Decodes `data` against `types`, strictly validating that every pointer
/// lies within the buffer, that no two elements' byte ranges overlap, and
/// that the tuple consumes exactly its declared length with nothing left
/// over.
pub fn decode_tuple(types: &[AbiType], data: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
    let cur = Cursor { data };
    let mut coverage = Coverage::default();
    let values = decode_tuple_words(types, &cur, 0, &mut coverage, true)?;

    let consumed = coverage.total_claimed();
    if consumed != data.len() {
        return Err(AbiError::TrailingOrMissingBytes { consumed, expected: data.len() });
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainrpc_primitives::Address;

    #[test]
    fn round_trip_simple_tuple() {
        let types = vec![AbiType::Address, AbiType::UInt(256)];
        let values = vec![
            AbiValue::Address(Address::from([0x11u8; 20])),
            AbiValue::UInt(U256::from(42u64), 256),
        ];
        let encoded = encode_tuple(&types, &values).unwrap();
        assert_eq!(encoded.len(), 64);
        let decoded = decode_tuple(&types, &encoded).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn round_trip_dynamic_bytes_and_array() {
        let types = vec![AbiType::Bytes, AbiType::Array(Box::new(AbiType::UInt(256)))];
        let values = vec![
            AbiValue::Bytes(vec![1, 2, 3, 4, 5].into()),
            AbiValue::Array(vec![
                AbiValue::UInt(U256::from(1u64), 256),
                AbiValue::UInt(U256::from(2u64), 256),
            ]),
        ];
        let encoded = encode_tuple(&types, &values).unwrap();
        let decoded = decode_tuple(&types, &encoded).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn round_trip_string_and_nested_tuple() {
        let types = vec![
            AbiType::String,
            AbiType::Tuple(vec![AbiType::Bool, AbiType::Bytes]),
        ];
        let values = vec![
            AbiValue::String("hello, abi".to_owned()),
            AbiValue::Tuple(vec![AbiValue::Bool(true), AbiValue::Bytes(vec![0xaa; 3].into())]),
        ];
        let encoded = encode_tuple(&types, &values).unwrap();
        let decoded = decode_tuple(&types, &encoded).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn offset_out_of_bounds_rejected() {
        let types = vec![AbiType::Bytes];
        // Head claims an offset far past the buffer.
        let mut bad = vec![0u8; 32];
        bad[31] = 200;
        let err = decode_tuple(&types, &bad).unwrap_err();
        assert!(matches!(err, AbiError::OffsetOutOfBounds { .. }));
    }

    #[test]
    fn overlapping_offsets_rejected() {
        let types = vec![AbiType::Bytes, AbiType::Bytes];
        let values = vec![
            AbiValue::Bytes(vec![1, 2, 3].into()),
            AbiValue::Bytes(vec![4, 5, 6].into()),
        ];
        let mut encoded = encode_tuple(&types, &values).unwrap();
        // Point the second field's offset at the first field's payload
        // instead of its own.
        let first_offset = encoded[32..64].to_vec();
        encoded[64..96].copy_from_slice(&first_offset);
        let err = decode_tuple(&types, &encoded).unwrap_err();
        assert!(matches!(err, AbiError::OverlappingRegion { .. }));
    }

    #[test]
    fn trailing_garbage_bytes_rejected() {
        let types = vec![AbiType::UInt(256)];
        let values = vec![AbiValue::UInt(U256::from(7u64), 256)];
        let mut encoded = encode_tuple(&types, &values).unwrap();
        encoded.extend_from_slice(&[0u8; 32]);
        let err = decode_tuple(&types, &encoded).unwrap_err();
        assert!(matches!(err, AbiError::TrailingOrMissingBytes { .. }));
    }

    #[test]
    fn offset_pointing_back_into_head_rejected() {
        let types = vec![AbiType::Bytes];
        let values = vec![AbiValue::Bytes(vec![1, 2, 3].into())];
        let mut encoded = encode_tuple(&types, &values).unwrap();
        // Offset of 0 points the payload back at the head itself.
        encoded[..32].copy_from_slice(&[0u8; 32]);
        let err = decode_tuple(&types, &encoded).unwrap_err();
        assert!(matches!(err, AbiError::OffsetOutOfBounds { .. }));
    }
}
