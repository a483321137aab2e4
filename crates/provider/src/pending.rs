//! Polling-based watcher for a transaction's inclusion and confirmation depth.

use std::time::Duration;

use chainrpc_json_rpc::RpcError;
use chainrpc_primitives::Hash;
use chainrpc_rpc_types::TransactionReceipt;
use chainrpc_transport::{Transport, TransportErrorKind};
use tracing::debug;

use crate::provider::Provider;

/// Why [`Provider::await_inclusion`] gave up on a transaction.
#[derive(Debug, thiserror::Error)]
pub enum PendingInclusionError {
    /// A call to the node failed outright.
    #[error(transparent)]
    Rpc(#[from] RpcError<TransportErrorKind>),
    /// `eth_getTransactionReceipt` came back empty for every retry.
    #[error("transaction {0} was not included after exhausting retries")]
    NotIncluded(Hash),
}

/// Configuration for [`Provider::await_inclusion`].
///
/// The watcher polls `eth_getTransactionReceipt` up to `retries` times,
/// `interval` apart. Once a receipt appears, it polls `eth_blockNumber`
/// until the chain height reaches `receipt.block_number + confirmations`.
/// A reverted transaction still counts as included — this watcher waits
/// for finality, not success.
#[derive(Debug, Clone, Copy)]
pub struct PendingTransactionConfig {
    tx_hash: Hash,
    retries: u32,
    interval: Duration,
    confirmations: u64,
}

impl PendingTransactionConfig {
    /// A default watch on `tx_hash`: one confirmation, 50 retries, 2
    /// seconds apart (100 seconds before giving up on inclusion).
    pub fn new(tx_hash: Hash) -> Self {
        Self { tx_hash, retries: 50, interval: Duration::from_secs(2), confirmations: 1 }
    }

    /// Sets the maximum number of `eth_getTransactionReceipt` polls before
    /// giving up.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the spacing between receipt polls.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets how many blocks must be mined at or after the receipt's block
    /// before the watcher is satisfied.
    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations;
        self
    }

    /// The transaction hash being watched.
    pub fn tx_hash(&self) -> Hash {
        self.tx_hash
    }
}

impl<T: Transport> Provider<T> {
    /// Waits for `config.tx_hash` to be mined and reach its requested
    /// confirmation depth, returning the final receipt.
    pub async fn await_inclusion(
        &self,
        config: PendingTransactionConfig,
    ) -> Result<TransactionReceipt, PendingInclusionError> {
        let receipt = self.poll_for_receipt(&config).await?;
        debug!(tx = %config.tx_hash, block = receipt.block_number, "transaction included");
        self.wait_for_confirmations(receipt.block_number, config.confirmations).await?;
        debug!(tx = %config.tx_hash, confirmations = config.confirmations, "confirmation depth reached");
        Ok(receipt)
    }

    async fn poll_for_receipt(
        &self,
        config: &PendingTransactionConfig,
    ) -> Result<TransactionReceipt, PendingInclusionError> {
        for attempt in 0..config.retries {
            if attempt > 0 {
                tokio::time::sleep(config.interval).await;
            }
            if let Some(receipt) = self.get_transaction_receipt(config.tx_hash).await? {
                return Ok(receipt);
            }
        }
        Err(PendingInclusionError::NotIncluded(config.tx_hash))
    }

    async fn wait_for_confirmations(&self, mined_at: u64, confirmations: u64) -> Result<(), PendingInclusionError> {
        let target = mined_at + confirmations;
        loop {
            let current = self.block_number().await?;
            if current >= target {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chainrpc_json_rpc::{RequestPacket, ResponsePacket};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// A transport scripted to answer `eth_getTransactionReceipt` with
    /// `null` a fixed number of times before returning a receipt, then
    /// `eth_blockNumber` with an ascending sequence of block heights.
    #[derive(Clone)]
    struct ScriptedNode {
        nulls_before_receipt: usize,
        receipt_block: u64,
        block_numbers_after: Vec<u64>,
        receipt_calls: Arc<AtomicUsize>,
        block_calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Transport for ScriptedNode {
        async fn call(&self, request: RequestPacket) -> Result<ResponsePacket, RpcError<TransportErrorKind>> {
            let RequestPacket::Single(req) = request else { panic!("expected a single request") };
            let id = serde_json::to_string(&req.id).unwrap();
            let body = match req.method {
                "eth_getTransactionReceipt" => {
                    let n = self.receipt_calls.fetch_add(1, Ordering::SeqCst);
                    if n < self.nulls_before_receipt {
                        "null".to_owned()
                    } else {
                        format!(
                            r#"{{"transactionHash":"0x{:064x}","transactionIndex":"0x0","blockHash":"0x{:064x}","blockNumber":"0x{:x}","from":"0x{:040x}","to":null,"contractAddress":null,"cumulativeGasUsed":"0x5208","gasUsed":"0x5208","logs":[],"logsBloom":"0x{:0512x}","status":"0x1"}}"#,
                            0, 0, self.receipt_block, 0, 0
                        )
                    }
                }
                "eth_blockNumber" => {
                    let n = self.block_calls.fetch_add(1, Ordering::SeqCst);
                    let height = self.block_numbers_after.get(n).copied().unwrap_or_else(|| *self.block_numbers_after.last().unwrap());
                    format!(r#""0x{height:x}""#)
                }
                other => panic!("unexpected method {other}"),
            };
            let full = format!(r#"{{"jsonrpc":"2.0","id":{id},"result":{body}}}"#);
            Ok(serde_json::from_str(&full).unwrap())
        }
    }

    #[tokio::test]
    async fn waits_through_null_receipts_then_confirmations() {
        let node = ScriptedNode {
            nulls_before_receipt: 4,
            receipt_block: 0x117dd3c,
            block_numbers_after: vec![0x117dd3d, 0x117dd3e, 0x117dd3f],
            receipt_calls: Arc::new(AtomicUsize::new(0)),
            block_calls: Arc::new(AtomicUsize::new(0)),
        };
        let provider = Provider::new(node.clone());
        let config = PendingTransactionConfig::new(Hash::ZERO)
            .with_retries(10)
            .with_interval(Duration::from_millis(1))
            .with_confirmations(3);

        let receipt = provider.await_inclusion(config).await.unwrap();
        assert_eq!(receipt.block_number, 0x117dd3c);
        assert_eq!(node.block_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausting_retries_reports_not_included() {
        let node = ScriptedNode {
            nulls_before_receipt: 100,
            receipt_block: 0,
            block_numbers_after: vec![0],
            receipt_calls: Arc::new(AtomicUsize::new(0)),
            block_calls: Arc::new(AtomicUsize::new(0)),
        };
        let provider = Provider::new(node);
        let config =
            PendingTransactionConfig::new(Hash::ZERO).with_retries(3).with_interval(Duration::from_millis(1));

        let err = provider.await_inclusion(config).await.unwrap_err();
        assert!(matches!(err, PendingInclusionError::NotIncluded(_)));
    }
}
