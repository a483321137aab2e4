//! Logs as returned by `eth_getLogs`, `eth_getTransactionReceipt`, and
//! `eth_subscribe("logs")`.

use chainrpc_primitives::{Address, Bytes, Hash};
use serde::{Deserialize, Serialize};

/// A single event log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// The contract that emitted this log.
    pub address: Address,
    /// Indexed topics, `topics[0]` is the event signature hash unless the
    /// event is anonymous.
    pub topics: Vec<Hash>,
    /// ABI-encoded non-indexed event arguments.
    pub data: Bytes,
    /// The block this log was recorded in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<Hash>,
    /// The block number this log was recorded in.
    #[serde(with = "crate::serde_helpers::quantity_opt", default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// The transaction that produced this log.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<Hash>,
    /// The transaction's index within its block.
    #[serde(with = "crate::serde_helpers::quantity_opt", default, skip_serializing_if = "Option::is_none")]
    pub transaction_index: Option<u64>,
    /// This log's index within its block.
    #[serde(with = "crate::serde_helpers::quantity_opt", default, skip_serializing_if = "Option::is_none")]
    pub log_index: Option<u64>,
    /// `true` if this log was removed by a chain reorganization.
    #[serde(default)]
    pub removed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_camel_case_json() {
        let log = Log {
            address: Address::ZERO,
            topics: vec![Hash::ZERO],
            data: Bytes::new(),
            block_number: Some(16),
            log_index: Some(0),
            ..Default::default()
        };
        let encoded = serde_json::to_value(&log).unwrap();
        assert_eq!(encoded["blockNumber"], "0x10");
        let decoded: Log = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, log);
    }
}
