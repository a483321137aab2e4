//! A typed wrapper over [`RpcClient`] exposing the common `eth_*` calls.

use chainrpc_consensus::{Signed, TypedTransaction};
use chainrpc_json_rpc::RpcError;
use chainrpc_primitives::{hex, Address, Bytes, Hash, U256, U64};
use chainrpc_rpc_client::RpcClient;
use chainrpc_rpc_types::{Block, BlockId, BlockNumberOrTag, CallRequest, FeeHistory, TransactionReceipt};
use chainrpc_transport::{Transport, TransportErrorKind};

/// A JSON-RPC client generic over its transport, with a typed method for
/// every call the pending-transaction watcher and a basic dapp backend
/// need.
///
/// Methods that the underlying node may legitimately answer with `null`
/// (an unmined transaction's receipt, a block past the chain head) return
/// `Option`; everything else treats a protocol-level failure as an error.
#[derive(Debug, Clone)]
pub struct Provider<T> {
    client: RpcClient<T>,
}

impl<T> Provider<T> {
    /// Wraps `transport` in a provider.
    pub fn new(transport: T) -> Self {
        Self { client: RpcClient::new(transport) }
    }

    /// Borrows the underlying JSON-RPC client, for calls this surface
    /// doesn't wrap.
    pub fn client(&self) -> &RpcClient<T> {
        &self.client
    }
}

impl<T: Transport> Provider<T> {
    /// The chain's current block height.
    pub async fn block_number(&self) -> Result<u64, RpcError<TransportErrorKind>> {
        self.client.request::<_, U64>("eth_blockNumber", &()).await.map(|n| n.to::<u64>())
    }

    /// The chain id the node reports.
    pub async fn chain_id(&self) -> Result<u64, RpcError<TransportErrorKind>> {
        self.client.request::<_, U64>("eth_chainId", &()).await.map(|n| n.to::<u64>())
    }

    /// The node's current suggested gas price.
    pub async fn gas_price(&self) -> Result<U256, RpcError<TransportErrorKind>> {
        self.client.request("eth_gasPrice", &()).await
    }

    /// An account's wei balance as of `block`.
    pub async fn get_balance(&self, address: Address, block: BlockId) -> Result<U256, RpcError<TransportErrorKind>> {
        self.client.request("eth_getBalance", &(address, block)).await
    }

    /// An account's nonce as of `block`.
    pub async fn get_transaction_count(
        &self,
        address: Address,
        block: BlockId,
    ) -> Result<u64, RpcError<TransportErrorKind>> {
        self.client.request::<_, U64>("eth_getTransactionCount", &(address, block)).await.map(|n| n.to::<u64>())
    }

    /// The bytecode deployed at `address` as of `block`.
    pub async fn get_code(&self, address: Address, block: BlockId) -> Result<Bytes, RpcError<TransportErrorKind>> {
        self.client.request("eth_getCode", &(address, block)).await
    }

    /// The raw storage slot `key` of `address` as of `block`.
    pub async fn get_storage_at(
        &self,
        address: Address,
        key: U256,
        block: BlockId,
    ) -> Result<U256, RpcError<TransportErrorKind>> {
        self.client.request("eth_getStorageAt", &(address, key, block)).await
    }

    /// A block by number or tag. `hashes_only` selects whether the
    /// transaction list carries full transaction objects or only hashes;
    /// this surface only models the hashes-only form.
    pub async fn get_block_by_number(
        &self,
        number: BlockNumberOrTag,
        hashes_only: bool,
    ) -> Result<Option<Block<Hash>>, RpcError<TransportErrorKind>> {
        self.client.request("eth_getBlockByNumber", &(number, !hashes_only)).await
    }

    /// A block by hash. See [`Self::get_block_by_number`] for the
    /// `hashes_only` flag's meaning.
    pub async fn get_block_by_hash(
        &self,
        hash: Hash,
        hashes_only: bool,
    ) -> Result<Option<Block<Hash>>, RpcError<TransportErrorKind>> {
        self.client.request("eth_getBlockByHash", &(hash, !hashes_only)).await
    }

    /// The receipt for a mined transaction, or `None` if it hasn't been
    /// mined (or doesn't exist).
    pub async fn get_transaction_receipt(
        &self,
        hash: Hash,
    ) -> Result<Option<TransactionReceipt>, RpcError<TransportErrorKind>> {
        self.client.request("eth_getTransactionReceipt", &(hash,)).await
    }

    /// Executes `request` against `block` without creating a transaction,
    /// returning the call's return data.
    pub async fn call(&self, request: &CallRequest, block: BlockId) -> Result<Bytes, RpcError<TransportErrorKind>> {
        self.client.request("eth_call", &(request, block)).await
    }

    /// Estimates the gas `request` would consume against `block`.
    pub async fn estimate_gas(
        &self,
        request: &CallRequest,
        block: BlockId,
    ) -> Result<u64, RpcError<TransportErrorKind>> {
        self.client.request::<_, U64>("eth_estimateGas", &(request, block)).await.map(|n| n.to::<u64>())
    }

    /// Historical base fees and gas usage ratios over `block_count` blocks
    /// ending at `newest_block`.
    pub async fn fee_history(
        &self,
        block_count: u64,
        newest_block: BlockNumberOrTag,
        reward_percentiles: &[f64],
    ) -> Result<FeeHistory, RpcError<TransportErrorKind>> {
        self.client
            .request(
                "eth_feeHistory",
                &(hex::encode_quantity(block_count as u128), newest_block, reward_percentiles),
            )
            .await
    }

    /// Asks the node to sign and send `request`, using an account it holds
    /// the key for. Returns the transaction hash.
    pub async fn send_transaction(&self, request: &CallRequest) -> Result<Hash, RpcError<TransportErrorKind>> {
        self.client.request("eth_sendTransaction", &(request,)).await
    }

    /// Broadcasts an already-signed, EIP-2718-encoded transaction. Returns
    /// the transaction hash.
    pub async fn send_raw_transaction(&self, encoded_tx: &[u8]) -> Result<Hash, RpcError<TransportErrorKind>> {
        self.client.request("eth_sendRawTransaction", &(hex::encode(encoded_tx),)).await
    }

    /// Encodes `signed` to its EIP-2718 wire form and broadcasts it.
    pub async fn send_raw_signed(&self, signed: &Signed<TypedTransaction>) -> Result<Hash, RpcError<TransportErrorKind>> {
        let mut buf = Vec::new();
        signed.tx().encode_signed(signed.signature(), &mut buf);
        self.send_raw_transaction(&buf).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chainrpc_json_rpc::{RequestPacket, ResponsePacket};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Canned {
        body: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Transport for Canned {
        async fn call(&self, request: RequestPacket) -> Result<ResponsePacket, RpcError<TransportErrorKind>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let RequestPacket::Single(req) = request else { panic!("expected a single request") };
            let body = format!(r#"{{"jsonrpc":"2.0","id":{},"result":{}}}"#, serde_json::to_string(&req.id).unwrap(), self.body);
            Ok(serde_json::from_str(&body).unwrap())
        }
    }

    #[tokio::test]
    async fn decodes_block_number_from_a_hex_quantity() {
        let provider = Provider::new(Canned { body: r#""0x5208""#, calls: Default::default() });
        assert_eq!(provider.block_number().await.unwrap(), 21_000);
    }

    #[tokio::test]
    async fn missing_receipt_decodes_as_none() {
        let provider = Provider::new(Canned { body: "null", calls: Default::default() });
        assert!(provider.get_transaction_receipt(Hash::ZERO).await.unwrap().is_none());
    }
}
