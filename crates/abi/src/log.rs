use crate::{codec, error::AbiError, ty::AbiType, value::AbiValue};
use chainrpc_primitives::{Address, Hash, U256};

/// One parameter of an event's signature, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventParam {
    /// The parameter's ABI type.
    pub ty: AbiType,
    /// Whether this parameter is part of the indexed topic list.
    pub indexed: bool,
}

impl EventParam {
    /// Shorthand for a non-indexed parameter.
    pub fn plain(ty: AbiType) -> Self {
        Self { ty, indexed: false }
    }

    /// Shorthand for an indexed parameter.
    pub fn indexed(ty: AbiType) -> Self {
        Self { ty, indexed: true }
    }

    /// Value types are stored directly in a topic slot; every other type
    /// (strings, bytes, arrays, tuples/structs) is only recoverable as its
    /// keccak-256 hash once indexed.
    fn is_value_type(&self) -> bool {
        matches!(
            self.ty,
            AbiType::Address | AbiType::Bool | AbiType::FixedBytes(_) | AbiType::UInt(_) | AbiType::Int(_)
        )
    }
}

fn decode_indexed_word(ty: &AbiType, word: &[u8; 32]) -> Result<AbiValue, AbiError> {
    Ok(match ty {
        AbiType::Address => {
            AbiValue::Address(Address::try_from_slice(&word[12..]).expect("slice is 20 bytes"))
        }
        AbiType::Bool => AbiValue::Bool(word[31] != 0),
        AbiType::FixedBytes(n) => AbiValue::FixedBytes(word[..*n as usize].to_vec()),
        AbiType::UInt(bits) => AbiValue::UInt(U256::from_be_bytes(*word), *bits),
        AbiType::Int(bits) => AbiValue::Int(U256::from_be_bytes(*word), *bits),
        _ => unreachable!("only called for value types"),
    })
}

/// Decodes an event's full, ordered argument list from its topics and data
/// blob.
///
/// `topics` must already have topic0 (the event signature hash) stripped
/// off by the caller, leaving only the indexed argument topics — callers
/// decoding an anonymous event simply pass all of its topics, since
/// anonymous events have no topic0.
///
/// Indexed reference-type arguments (`bytes`, `string`, arrays,
/// tuples/structs) cannot be recovered from their topic; they decode to
/// the raw 32-byte keccak-256 hash that was indexed, exposed as
/// [`AbiValue::FixedBytes`].
pub fn decode_log(params: &[EventParam], topics: &[Hash], data: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
    let indexed_count = params.iter().filter(|p| p.indexed).count();
    if topics.len() != indexed_count {
        return Err(AbiError::TypeMismatch(format!(
            "event declares {indexed_count} indexed parameters, got {} topics",
            topics.len()
        )));
    }

    let data_types: Vec<AbiType> = params.iter().filter(|p| !p.indexed).map(|p| p.ty.clone()).collect();
    let mut data_values = codec::decode_tuple(&data_types, data)?.into_iter();
    let mut topic_values = topics.iter();

    let mut out = Vec::with_capacity(params.len());
    for param in params {
        if param.indexed {
            let topic = topic_values.next().expect("length checked above");
            let value = if param.is_value_type() {
                decode_indexed_word(&param.ty, &topic.0)?
            } else {
                AbiValue::FixedBytes(topic.0.to_vec())
            };
            out.push(value);
        } else {
            out.push(data_values.next().expect("counts match data_types"));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_value_type_topics_and_data_body() {
        let params = vec![
            EventParam::indexed(AbiType::Address),
            EventParam::indexed(AbiType::Address),
            EventParam::plain(AbiType::UInt(256)),
        ];
        let from = Address::from([0x11u8; 20]);
        let to = Address::from([0x22u8; 20]);
        let mut from_topic = [0u8; 32];
        from_topic[12..].copy_from_slice(from.as_slice());
        let mut to_topic = [0u8; 32];
        to_topic[12..].copy_from_slice(to.as_slice());
        let topics = vec![Hash::new(from_topic), Hash::new(to_topic)];
        let data = codec::encode_tuple(&[AbiType::UInt(256)], &[AbiValue::UInt(U256::from(7u64), 256)])
            .unwrap();

        let values = decode_log(&params, &topics, &data).unwrap();
        assert_eq!(values[0], AbiValue::Address(from));
        assert_eq!(values[1], AbiValue::Address(to));
        assert_eq!(values[2], AbiValue::UInt(U256::from(7u64), 256));
    }

    #[test]
    fn indexed_reference_type_decodes_to_its_hash() {
        let params = vec![EventParam::indexed(AbiType::String)];
        let hash = Hash::new([0x42u8; 32]);
        let values = decode_log(&params, &[hash], &[]).unwrap();
        assert_eq!(values[0], AbiValue::FixedBytes(hash.0.to_vec()));
    }

    #[test]
    fn topic_count_mismatch_is_rejected() {
        let params = vec![EventParam::indexed(AbiType::Address)];
        let err = decode_log(&params, &[], &[]).unwrap_err();
        assert!(matches!(err, AbiError::TypeMismatch(_)));
    }
}
