//! EIP-55 / EIP-1191 checksummed address formatting.

use crate::hex;
use sha3::{Digest, Keccak256};

/// Computes the EIP-55 (or, with a `chain_id`, EIP-1191) checksum casing
/// for a 20-byte address and returns it as a `0x`-prefixed string.
pub fn checksum(addr: &[u8; 20], chain_id: Option<u64>) -> String {
    let lower = hex::encode_no_prefix(addr);

    let mut hasher = Keccak256::new();
    if let Some(id) = chain_id {
        // EIP-1191: hash `"{chainId}0x{address}"` instead of the bare address.
        hasher.update(format!("{id}0x{lower}").as_bytes());
    } else {
        hasher.update(lower.as_bytes());
    }
    let digest = hasher.finalize();

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        if c.is_ascii_digit() {
            out.push(c);
            continue;
        }
        // Each hex character of the digest controls the case of the
        // corresponding address nibble: the high nibble of digest byte i/2
        // governs even indices, the low nibble governs odd indices.
        let nibble = if i % 2 == 0 { digest[i / 2] >> 4 } else { digest[i / 2] & 0x0f };
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Validates that `s` is either all-lowercase, all-uppercase (ignoring the
/// `0x` prefix and digits), or matches the checksum for the given chain id.
pub fn is_valid_checksum(s: &str, chain_id: Option<u64>) -> bool {
    let Ok(bytes) = hex::decode(s) else { return false };
    let Ok(addr) = <[u8; 20]>::try_from(bytes.as_slice()) else { return false };
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    if digits.chars().all(|c| !c.is_alphabetic()) {
        return true;
    }
    if digits == digits.to_lowercase() || digits == digits.to_uppercase() {
        return true;
    }
    checksum(&addr, chain_id) == s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eip55_vector() {
        let addr: [u8; 20] =
            hex::decode("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap().try_into().unwrap();
        assert_eq!(checksum(&addr, None), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    }

    #[test]
    fn eip1191_changes_case_by_chain() {
        let addr: [u8; 20] =
            hex::decode("27b1fdb04752bbc536007a920d24acb045561c26").unwrap().try_into().unwrap();
        let mainnet = checksum(&addr, Some(1));
        let rsk = checksum(&addr, Some(30));
        assert_ne!(mainnet, rsk);
    }
}
