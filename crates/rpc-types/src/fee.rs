//! `eth_feeHistory` response.

use serde::{Deserialize, Serialize};

/// Historical base fees and gas usage ratios over a window of blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeHistory {
    /// The oldest block covered by this response.
    #[serde(with = "crate::serde_helpers::quantity")]
    pub oldest_block: u64,
    /// Base fee per gas for each block in range, plus one trailing entry
    /// projecting the next block's base fee.
    #[serde(default)]
    pub base_fee_per_gas: Vec<u128>,
    /// Ratio of gas used to gas limit for each block in range.
    #[serde(default)]
    pub gas_used_ratio: Vec<f64>,
    /// Base fee per blob gas for each block in range, present post-EIP-4844.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_fee_per_blob_gas: Vec<u128>,
    /// Ratio of blob gas used to the blob gas target for each block.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blob_gas_used_ratio: Vec<f64>,
    /// Requested percentile rewards per block, if percentiles were
    /// requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<Vec<Vec<u128>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let history = FeeHistory {
            oldest_block: 100,
            base_fee_per_gas: vec![1_000_000_000, 1_100_000_000],
            gas_used_ratio: vec![0.5],
            ..Default::default()
        };
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json["oldestBlock"], "0x64");
        let decoded: FeeHistory = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, history);
    }
}
