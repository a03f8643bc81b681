//! Chain-facing types and error definitions.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use thiserror::Error;

use crate::chain::node::{NodeError, NodeTransaction};
use crate::chain::units::to_display_units;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors returned by [`ChainClient`](crate::chain::ChainClient) operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Node unreachable or returned malformed data.
    #[error("node connection error: {0}")]
    Connection(String),

    /// Private key is not valid hex or not a valid curve scalar.
    #[error("invalid private key: {0}")]
    KeyParse(String),

    /// Internal cryptographic failure while signing.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Node rejected or failed to relay the signed transaction.
    #[error("broadcast failed; fromAddress: {from}: {reason}")]
    Broadcast { from: Address, reason: String },

    /// Amount is unparsable, non-positive or out of range.
    #[error("invalid amount: {0}")]
    Conversion(String),

    /// Recipient address is malformed. The input is not echoed back.
    #[error("invalid recipient address: {0}")]
    InvalidAddress(String),
}

impl From<NodeError> for ChainError {
    fn from(err: NodeError) -> Self {
        ChainError::Connection(err.to_string())
    }
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Balance of one account at the latest known state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSummary {
    pub address: Address,
    /// Raw balance in base units.
    pub balance: U256,
    /// Display-only decimal rendering of `balance`.
    pub balance_display: String,
}

impl BalanceSummary {
    pub fn new(address: Address, balance: U256) -> Self {
        Self {
            address,
            balance,
            balance_display: to_display_units(balance),
        }
    }
}

/// One transaction collected by the backward block scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxSummary {
    pub block_number: u64,
    pub hash: TxHash,
    pub value: U256,
    pub value_display: String,
    pub gas_limit: u64,
    pub gas_price: u128,
    /// Raw payload, not decoded.
    pub input: Bytes,
    /// `None` for contract-creation transactions.
    pub to: Option<Address>,
}

impl TxSummary {
    pub fn from_node(block_number: u64, tx: NodeTransaction) -> Self {
        Self {
            block_number,
            hash: tx.hash,
            value_display: to_display_units(tx.value),
            value: tx.value,
            gas_limit: tx.gas_limit,
            gas_price: tx.gas_price,
            input: tx.input,
            to: tx.to,
        }
    }

    /// Whether this transaction deployed a contract instead of calling an address.
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }
}

/// Receipt of submission for a broadcast transfer.
///
/// This does not mean the transfer was included in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub tx_hash: TxHash,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub nonce: u64,
    pub gas_price: u128,
    pub chain_id: ChainId,
}
