//! `eth_call`/`eth_sendTransaction`/`eth_estimateGas` request bodies.

use crate::other::OtherFields;
use chainrpc_consensus::AccessList;
use chainrpc_primitives::{Address, Bytes, ChainId, U256};
use serde::{Deserialize, Serialize};

/// A transaction call request. Every field is optional: the node fills gaps
/// (nonce, gas limit, current base fee) from its own state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallRequest {
    /// The sending account. Required for `eth_sendTransaction`, optional
    /// (defaults to the zero address) for `eth_call`.
    pub from: Option<Address>,
    /// The call target; absent means contract creation.
    pub to: Option<Address>,
    /// Legacy gas price.
    #[serde(with = "crate::serde_helpers::quantity_opt", skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u64>,
    /// `maxPriorityFeePerGas`.
    pub max_priority_fee_per_gas: Option<U256>,
    /// `maxFeePerGas`.
    pub max_fee_per_gas: Option<U256>,
    /// Gas limit.
    #[serde(with = "crate::serde_helpers::quantity_opt", skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
    /// Wei transferred.
    pub value: Option<U256>,
    /// Call data. `data` is the wire field name, per the JSON-RPC
    /// convention for call requests (as opposed to `input` for responses).
    pub data: Option<Bytes>,
    /// Sender nonce.
    #[serde(with = "crate::serde_helpers::quantity_opt", skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    /// Pre-declared touched addresses and storage keys.
    pub access_list: Option<AccessList>,
    /// The chain this call is bound to.
    pub chain_id: Option<ChainId>,
    /// Fields not modeled above, preserved verbatim.
    #[serde(flatten)]
    pub other: OtherFields,
}

impl CallRequest {
    /// Whether this request carries enough gas and call data to be
    /// considered "fillable" as a transaction.
    pub fn is_fillable(&self) -> bool {
        self.gas.map_or(true, |gas| gas >= 21_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_data_field_for_call_requests() {
        let req = CallRequest { data: Some(vec![0xde, 0xad].into()), ..Default::default() };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["data"], "0xdead");
    }

    #[test]
    fn missing_gas_is_fillable_by_default() {
        assert!(CallRequest::default().is_fillable());
    }

    #[test]
    fn too_little_gas_is_not_fillable() {
        let req = CallRequest { gas: Some(100), ..Default::default() };
        assert!(!req.is_fillable());
    }
}
