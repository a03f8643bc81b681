//! Node RPC port and its JSON-RPC implementation.
//!
//! # Responsibilities
//! - Define the node capabilities the gateway consumes ([`NodeRpc`])
//! - Translate node responses into crate-owned block and transaction types
//! - Provide the alloy-backed HTTP implementation ([`AlloyNode`])

use alloy::consensus::Transaction as ConsensusTx;
use alloy::eips::BlockNumberOrTag;
use alloy::network::TransactionResponse;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::TransportResult;
use async_trait::async_trait;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

use crate::config::NodeConfig;
use crate::observability::metrics;

/// Errors reported by a node connection.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Transport failure or JSON-RPC error response.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Call did not complete within the configured timeout.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Node does not know the requested block.
    #[error("block {0} not found")]
    MissingBlock(u64),

    /// Node returned a block without full transaction bodies.
    #[error("block {0} returned without transaction bodies")]
    MissingBodies(u64),
}

/// Result type for node calls.
pub type NodeResult<T> = Result<T, NodeError>;

/// A transaction as read from a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTransaction {
    pub hash: TxHash,
    /// `None` for contract creation.
    pub to: Option<Address>,
    pub value: U256,
    pub gas_limit: u64,
    /// Legacy gas price, or the fee cap for dynamic-fee transactions.
    pub gas_price: u128,
    pub input: Bytes,
}

/// A block with its transactions in native order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeBlock {
    pub number: u64,
    pub transactions: Vec<NodeTransaction>,
}

/// Node capabilities consumed by the gateway.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait NodeRpc: Send + Sync {
    /// Number of the most recent block.
    async fn latest_block_number(&self) -> NodeResult<u64>;

    /// Block at `number` with full transaction bodies.
    async fn block_with_transactions(&self, number: u64) -> NodeResult<NodeBlock>;

    /// Balance of `address` at the latest state.
    async fn balance(&self, address: Address) -> NodeResult<U256>;

    /// Next unused nonce of `address`, counting pending transactions.
    async fn pending_nonce(&self, address: Address) -> NodeResult<u64>;

    /// Gas price suggested by the node.
    async fn gas_price(&self) -> NodeResult<u128>;

    /// Chain identifier of the network.
    async fn chain_id(&self) -> NodeResult<u64>;

    /// Submit a signed, encoded transaction and return its hash.
    async fn send_raw_transaction(&self, raw: Bytes) -> NodeResult<TxHash>;
}

/// [`NodeRpc`] over an alloy HTTP provider.
#[derive(Clone)]
pub struct AlloyNode {
    provider: Arc<dyn Provider + Send + Sync>,
    rpc_url: String,
    timeout_secs: Option<u64>,
}

impl AlloyNode {
    /// Create a node handle for the configured endpoint.
    ///
    /// No request is made until the first call.
    pub fn connect(config: &NodeConfig) -> NodeResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            NodeError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let provider =
            Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>;

        Ok(Self {
            provider,
            rpc_url: config.rpc_url.clone(),
            timeout_secs: config.rpc_timeout_secs,
        })
    }

    /// Await one provider call, applying the optional timeout.
    async fn call<T, F>(&self, method: &'static str, fut: F) -> NodeResult<T>
    where
        F: IntoFuture<Output = TransportResult<T>>,
    {
        let result = match self.timeout_secs {
            Some(secs) => match timeout(Duration::from_secs(secs), fut.into_future()).await {
                Ok(result) => result.map_err(|e| NodeError::Rpc(e.to_string())),
                Err(_) => Err(NodeError::Timeout(secs)),
            },
            None => fut.await.map_err(|e| NodeError::Rpc(e.to_string())),
        };

        metrics::record_node_call(method, result.is_ok());
        if let Err(e) = &result {
            tracing::debug!(method, error = %e, "Node call failed");
        }
        result
    }
}

#[async_trait]
impl NodeRpc for AlloyNode {
    async fn latest_block_number(&self) -> NodeResult<u64> {
        self.call("eth_blockNumber", self.provider.get_block_number()).await
    }

    async fn block_with_transactions(&self, number: u64) -> NodeResult<NodeBlock> {
        let block = self
            .call(
                "eth_getBlockByNumber",
                self.provider
                    .get_block_by_number(BlockNumberOrTag::Number(number))
                    .full(),
            )
            .await?
            .ok_or(NodeError::MissingBlock(number))?;

        let txs = block
            .transactions
            .as_transactions()
            .ok_or(NodeError::MissingBodies(number))?;

        let transactions = txs
            .iter()
            .map(|tx| NodeTransaction {
                hash: TransactionResponse::tx_hash(tx),
                to: ConsensusTx::to(tx),
                value: ConsensusTx::value(tx),
                gas_limit: ConsensusTx::gas_limit(tx),
                gas_price: ConsensusTx::gas_price(tx)
                    .unwrap_or_else(|| ConsensusTx::max_fee_per_gas(tx)),
                input: ConsensusTx::input(tx).clone(),
            })
            .collect();

        Ok(NodeBlock { number, transactions })
    }

    async fn balance(&self, address: Address) -> NodeResult<U256> {
        self.call("eth_getBalance", self.provider.get_balance(address)).await
    }

    async fn pending_nonce(&self, address: Address) -> NodeResult<u64> {
        self.call(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address).pending(),
        )
        .await
    }

    async fn gas_price(&self) -> NodeResult<u128> {
        self.call("eth_gasPrice", self.provider.get_gas_price()).await
    }

    async fn chain_id(&self) -> NodeResult<u64> {
        self.call("eth_chainId", self.provider.get_chain_id()).await
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> NodeResult<TxHash> {
        let pending = self
            .call(
                "eth_sendRawTransaction",
                self.provider.send_raw_transaction(&raw),
            )
            .await?;
        Ok(*pending.tx_hash())
    }
}

impl std::fmt::Debug for AlloyNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlloyNode")
            .field("rpc_url", &self.rpc_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
