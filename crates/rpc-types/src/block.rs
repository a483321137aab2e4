//! `eth_getBlockByNumber`/`eth_getBlockByHash` responses.

use crate::other::OtherFields;
use chainrpc_primitives::{Address, Bloom, Bytes, Hash, U256};
use serde::{Deserialize, Serialize};

/// A block header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    /// This block's hash.
    pub hash: Option<Hash>,
    /// The previous block's hash.
    pub parent_hash: Hash,
    /// The uncle/ommers hash (`0x1dcc4d...` for a block with no uncles).
    pub sha3_uncles: Hash,
    /// The beneficiary of the block's fees.
    pub miner: Address,
    /// Root of the post-block state trie.
    pub state_root: Hash,
    /// Root of this block's transaction trie.
    pub transactions_root: Hash,
    /// Root of this block's receipt trie.
    pub receipts_root: Hash,
    /// Bloom filter over every log in this block.
    pub logs_bloom: Bloom,
    /// The block number. `None` for a pending block.
    #[serde(with = "crate::serde_helpers::quantity_opt", default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    /// The gas limit this block enforced.
    #[serde(with = "crate::serde_helpers::quantity")]
    pub gas_limit: u64,
    /// The gas actually used by this block's transactions.
    #[serde(with = "crate::serde_helpers::quantity")]
    pub gas_used: u64,
    /// Seconds since the Unix epoch.
    #[serde(with = "crate::serde_helpers::quantity")]
    pub timestamp: u64,
    /// Arbitrary data the block's proposer attached.
    pub extra_data: Bytes,
    /// The base fee burned per unit of gas, post-EIP-1559.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_fee_per_gas: Option<u128>,
    /// The block size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<U256>,
}

/// A block's transaction list: either transaction hashes, or full
/// transaction objects, depending on the `fullTransactionObjects` request
/// flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockTransactions<T> {
    /// Only hashes were requested.
    Hashes(Vec<Hash>),
    /// Full transaction objects were requested.
    Full(Vec<T>),
}

impl<T> Default for BlockTransactions<T> {
    fn default() -> Self {
        Self::Hashes(Vec::new())
    }
}

impl<T> BlockTransactions<T> {
    /// The number of transactions, regardless of representation.
    pub fn len(&self) -> usize {
        match self {
            Self::Hashes(h) => h.len(),
            Self::Full(t) => t.len(),
        }
    }

    /// `true` if this block has no transactions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A block, generic over its transaction representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block<T = Hash> {
    /// The block header.
    #[serde(flatten)]
    pub header: Header,
    /// Hashes of this block's uncles.
    #[serde(default)]
    pub uncles: Vec<Hash>,
    /// This block's transactions.
    #[serde(default)]
    pub transactions: BlockTransactions<T>,
    /// Fields not modeled above, preserved verbatim.
    #[serde(flatten)]
    pub other: OtherFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_transactions_reports_length_either_way() {
        let hashes = BlockTransactions::<Hash>::Hashes(vec![Hash::ZERO, Hash::ZERO]);
        assert_eq!(hashes.len(), 2);
        assert!(!hashes.is_empty());
    }

    #[test]
    fn header_round_trips_quantity_fields() {
        let header = Header { number: Some(100), gas_limit: 30_000_000, gas_used: 15_000, timestamp: 1_700_000_000, ..Default::default() };
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["number"], "0x64");
        let decoded: Header = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, header);
    }
}
