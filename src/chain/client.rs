//! Chain client: all reads and writes the gateway performs against a node.
//!
//! # Responsibilities
//! - Query chain state (height, chain id, balances, recent transactions)
//! - Build, sign and broadcast native-currency transfers
//! - Return structured values; rendering is left to the caller
//!
//! Every call recomputes what it needs (nonce, gas price, chain id). Nothing is
//! cached between requests, so concurrent transfers from one sender may race
//! on the nonce and one of them can be rejected by the node.

use alloy::hex;
use alloy::primitives::Address;
use futures_util::TryStreamExt;
use std::sync::Arc;

use crate::chain::node::{AlloyNode, NodeRpc};
use crate::chain::scan::BlockScan;
use crate::chain::transfer::UnsignedTransfer;
use crate::chain::types::{
    BalanceSummary, ChainError, ChainId, ChainResult, TransferReceipt, TxSummary,
};
use crate::chain::units::to_base_units;
use crate::chain::wallet::Wallet;
use crate::config::NodeConfig;

const ADDRESS_LEN: usize = 20;

/// Shared handle to one node endpoint.
///
/// Cheap to clone; clones share the underlying connection.
#[derive(Clone)]
pub struct ChainClient {
    node: Arc<dyn NodeRpc>,
}

impl ChainClient {
    pub fn new(node: Arc<dyn NodeRpc>) -> Self {
        Self { node }
    }

    /// Create a client backed by the JSON-RPC endpoint in `config`.
    pub fn connect(config: &NodeConfig) -> ChainResult<Self> {
        let node = AlloyNode::connect(config)?;
        tracing::info!(rpc_url = %config.rpc_url, "Chain client initialized");
        Ok(Self::new(Arc::new(node)))
    }

    /// Number of the most recent block.
    pub async fn latest_height(&self) -> ChainResult<u64> {
        Ok(self.node.latest_block_number().await?)
    }

    /// Chain identifier used for transaction domain separation.
    pub async fn chain_id(&self) -> ChainResult<ChainId> {
        Ok(ChainId(self.node.chain_id().await?))
    }

    /// Balance of `address_hex` at the latest state.
    ///
    /// Malformed hex is not an error: it reads the balance of the address the
    /// lenient parser produces (see [`parse_address_lenient`]).
    pub async fn balance(&self, address_hex: &str) -> ChainResult<BalanceSummary> {
        let address = parse_address_lenient(address_hex);
        let balance = self.node.balance(address).await?;
        Ok(BalanceSummary::new(address, balance))
    }

    /// Start a lazy scan over the most recent transactions.
    pub async fn scan_recent(&self, limit: usize) -> ChainResult<BlockScan> {
        BlockScan::start(self.node.clone(), limit).await
    }

    /// Up to `limit` most recent transactions, newest block first.
    ///
    /// Any block fetch failure aborts the scan and discards what was collected.
    pub async fn recent_transactions(&self, limit: usize) -> ChainResult<Vec<TxSummary>> {
        self.scan_recent(limit).await?.into_stream().try_collect().await
    }

    /// Sign and broadcast a transfer of `amount` display units.
    ///
    /// Returns once the node accepted the transaction; inclusion in a block is
    /// not awaited.
    pub async fn send_transfer(
        &self,
        private_key_hex: &str,
        to_hex: &str,
        amount: f64,
    ) -> ChainResult<TransferReceipt> {
        let wallet = Wallet::from_private_key(private_key_hex)?;
        let from = wallet.address();
        let to = parse_address_strict(to_hex)?;
        let value = to_base_units(amount)?;

        let nonce = self.node.pending_nonce(from).await?;
        let gas_price = self.node.gas_price().await?;
        let chain_id = self.chain_id().await?;

        let unsigned = UnsignedTransfer::new(from, to, value, nonce, gas_price, chain_id);
        let signed = unsigned.sign(&wallet)?;

        let tx_hash = self
            .node
            .send_raw_transaction(signed.encoded())
            .await
            .map_err(|e| ChainError::Broadcast {
                from,
                reason: e.to_string(),
            })?;

        tracing::info!(
            tx_hash = %tx_hash,
            from = %from,
            to = %to,
            nonce,
            "Transfer broadcast"
        );

        Ok(TransferReceipt {
            tx_hash,
            from,
            to,
            value,
            nonce,
            gas_price,
            chain_id,
        })
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient").finish_non_exhaustive()
    }
}

/// Parse an address the forgiving way: invalid hex decodes to nothing and
/// short input is left-padded, so garbage yields the zero address.
///
/// Only the last 20 bytes of over-long input are kept.
pub fn parse_address_lenient(input: &str) -> Address {
    let digits = input.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);

    let bytes = if digits.len() % 2 == 1 {
        hex::decode(format!("0{}", digits))
    } else {
        hex::decode(digits)
    }
    .unwrap_or_default();

    let tail = &bytes[bytes.len().saturating_sub(ADDRESS_LEN)..];
    let mut padded = [0u8; ADDRESS_LEN];
    padded[ADDRESS_LEN - tail.len()..].copy_from_slice(tail);
    Address::from(padded)
}

/// Parse a recipient address, rejecting anything but 20 hex-encoded bytes.
pub fn parse_address_strict(input: &str) -> ChainResult<Address> {
    input
        .trim()
        .parse::<Address>()
        .map_err(|e| ChainError::InvalidAddress(e.to_string()))
}
