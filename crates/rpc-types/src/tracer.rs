//! `debug_traceTransaction`/`debug_traceCall` tracer configuration and the
//! call-tracer response shape.

use chainrpc_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Options accompanying a `debug_trace*` call, selecting a named tracer (or
/// the default struct-logger) and its JavaScript/native configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TracingOptions {
    /// A built-in tracer name (`"callTracer"`, `"prestateTracer"`, ...), or
    /// `None` for the default opcode-level struct logger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracer: Option<String>,
    /// Tracer-specific JSON configuration, interpreted by the named tracer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracer_config: Option<serde_json::Value>,
    /// Maximum trace duration, as a Go duration string (`"5s"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    /// Disable capturing each step's stack (struct logger only).
    pub disable_stack: bool,
    /// Disable capturing each step's memory (struct logger only).
    pub disable_memory: bool,
    /// Disable capturing storage writes (struct logger only).
    pub disable_storage: bool,
}

/// The response shape for `debug_traceTransaction` with
/// `tracer: "callTracer"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
    /// The call's initiator.
    pub from: Address,
    /// Gas available when the call started.
    pub gas: U256,
    /// Gas consumed by the call.
    pub gas_used: U256,
    /// The call target, absent for contract creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Calldata.
    pub input: Bytes,
    /// Return data, if the call completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Bytes>,
    /// An EVM error message, if the call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The revert reason, if the call reverted with one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revert_reason: Option<String>,
    /// Nested calls made by this call.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calls: Vec<CallFrame>,
    /// Logs emitted directly by this call.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<CallLogFrame>,
    /// Wei transferred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    /// `CALL`, `DELEGATECALL`, `STATICCALL`, or `CREATE`/`CREATE2`.
    #[serde(rename = "type")]
    pub call_type: String,
}

impl CallFrame {
    /// `true` if this call reverted.
    pub fn is_revert(&self) -> bool {
        self.error.is_some()
    }
}

/// A log emitted within a traced call frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLogFrame {
    /// The emitting contract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Indexed topics.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<chainrpc_primitives::Hash>,
    /// Non-indexed event data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_options_omit_unset_fields() {
        let opts = TracingOptions { tracer: Some("callTracer".to_owned()), ..Default::default() };
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["tracer"], "callTracer");
        assert!(json.get("timeout").is_none());
    }

    #[test]
    fn call_frame_reports_revert() {
        let frame = CallFrame { error: Some("execution reverted".to_owned()), ..Default::default() };
        assert!(frame.is_revert());
    }
}
