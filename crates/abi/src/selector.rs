use crate::ty::{canonical_signature, AbiType};
use chainrpc_primitives::{keccak256, Hash};

/// Computes the 4-byte function selector: the first four bytes of
/// `keccak256("name(type,type,...)")`.
pub fn function_selector(name: &str, params: &[AbiType]) -> [u8; 4] {
    let sig = canonical_signature(name, params);
    let hash = keccak256(sig.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash.as_slice()[..4]);
    out
}

/// Computes an event's topic0: the full `keccak256` of its canonical
/// signature. Anonymous events have no topic0 and callers should not
/// include this in the topics list for them.
pub fn event_topic0(name: &str, params: &[AbiType]) -> Hash {
    let sig = canonical_signature(name, params);
    keccak256(sig.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_matches_known_value() {
        // transfer(address,uint256) => 0xa9059cbb
        let sel = function_selector("transfer", &[AbiType::Address, AbiType::UInt(256)]);
        assert_eq!(sel, [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn topic0_matches_known_value() {
        // Transfer(address,address,uint256)
        let topic = event_topic0(
            "Transfer",
            &[AbiType::Address, AbiType::Address, AbiType::UInt(256)],
        );
        assert_eq!(
            topic.to_string(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }
}
