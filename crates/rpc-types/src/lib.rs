//! JSON-RPC wire types for blocks, transactions, logs, receipts, call
//! requests, state overrides, fee history, and debug tracer configuration.

pub mod block;
pub mod block_id;
pub mod call;
pub mod fee;
pub mod log;
pub mod other;
pub mod receipt;
pub mod serde_helpers;
pub mod state;
pub mod tracer;

pub use block::{Block, BlockTransactions, Header};
pub use block_id::{BlockId, BlockNumberOrTag};
pub use call::CallRequest;
pub use fee::FeeHistory;
pub use log::Log;
pub use other::OtherFields;
pub use receipt::TransactionReceipt;
pub use state::{AccountOverride, StateOverride, StateOverrideError};
pub use tracer::{CallFrame, CallLogFrame, TracingOptions};
