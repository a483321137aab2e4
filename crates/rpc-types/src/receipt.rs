//! `eth_getTransactionReceipt` response.

use crate::log::Log;
use chainrpc_primitives::{Address, Bloom, Hash};
use serde::{Deserialize, Serialize};

/// The outcome of a mined transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// The transaction this receipt describes.
    pub transaction_hash: Hash,
    /// The transaction's index within its block.
    #[serde(with = "crate::serde_helpers::quantity")]
    pub transaction_index: u64,
    /// The block this transaction was mined in.
    pub block_hash: Hash,
    /// The block number this transaction was mined in.
    #[serde(with = "crate::serde_helpers::quantity")]
    pub block_number: u64,
    /// The sender.
    pub from: Address,
    /// The recipient, or `None` for a contract creation.
    pub to: Option<Address>,
    /// The address of the contract created, if this was a creation.
    pub contract_address: Option<Address>,
    /// Total gas used in the block up to and including this transaction.
    #[serde(with = "crate::serde_helpers::quantity")]
    pub cumulative_gas_used: u64,
    /// Gas used by this transaction alone.
    #[serde(with = "crate::serde_helpers::quantity")]
    pub gas_used: u64,
    /// Gas price actually paid per unit of gas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_gas_price: Option<u128>,
    /// Logs emitted by this transaction.
    pub logs: Vec<Log>,
    /// The bloom filter over this transaction's logs.
    pub logs_bloom: Bloom,
    /// `1` for success, `0` for revert (pre-Byzantium receipts carry a
    /// state root here instead; this crate only models the post-Byzantium
    /// status form).
    #[serde(with = "crate::serde_helpers::quantity_opt", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u64>,
    /// The EIP-2718 transaction type.
    #[serde(rename = "type", with = "crate::serde_helpers::quantity_opt", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<u64>,
}

impl TransactionReceipt {
    /// `true` if the transaction succeeded (status `1`, or no status field
    /// on a pre-Byzantium receipt — those can't be distinguished here and
    /// are treated as successful since a watcher's job is to wait for
    /// finality, not success).
    pub fn succeeded(&self) -> bool {
        self.status.map_or(true, |s| s == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TransactionReceipt {
        TransactionReceipt {
            transaction_hash: Hash::ZERO,
            transaction_index: 0,
            block_hash: Hash::ZERO,
            block_number: 100,
            from: Address::ZERO,
            to: Some(Address::from([1u8; 20])),
            contract_address: None,
            cumulative_gas_used: 21_000,
            gas_used: 21_000,
            effective_gas_price: Some(1_000_000_000),
            logs: vec![],
            logs_bloom: Bloom::ZERO,
            status: Some(1),
            transaction_type: Some(2),
        }
    }

    #[test]
    fn status_one_is_success() {
        assert!(sample().succeeded());
    }

    #[test]
    fn status_zero_is_failure() {
        let mut r = sample();
        r.status = Some(0);
        assert!(!r.succeeded());
    }

    #[test]
    fn round_trips_through_json() {
        let receipt = sample();
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["blockNumber"], "0x64");
        let decoded: TransactionReceipt = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, receipt);
    }
}
