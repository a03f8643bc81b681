//! Transfer construction and signing.
//!
//! # Lifecycle
//! ```text
//! UnsignedTransfer ──sign(wallet)──▶ SignedTransfer ──broadcast──▶ TransferReceipt
//! ```
//! The signature covers the chain id (EIP-155), so a transfer signed for one
//! chain does not validate on another.

use alloy::consensus::{SignableTransaction, Signed, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};

use crate::chain::types::{ChainId, ChainResult};
use crate::chain::wallet::Wallet;

/// Gas limit of a plain value transfer with no payload.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// A native-currency transfer that has not been signed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransfer {
    from: Address,
    tx: TxLegacy,
}

impl UnsignedTransfer {
    /// Build a transfer with the fixed gas limit and an empty payload.
    pub fn new(
        from: Address,
        to: Address,
        value: U256,
        nonce: u64,
        gas_price: u128,
        chain_id: ChainId,
    ) -> Self {
        let tx = TxLegacy {
            chain_id: Some(chain_id.0),
            nonce,
            gas_price,
            gas_limit: TRANSFER_GAS_LIMIT,
            to: TxKind::Call(to),
            value,
            input: Bytes::new(),
        };
        Self { from, tx }
    }

    pub fn from(&self) -> Address {
        self.from
    }

    pub fn transaction(&self) -> &TxLegacy {
        &self.tx
    }

    /// Sign with `wallet`, consuming the unsigned transfer.
    pub fn sign(self, wallet: &Wallet) -> ChainResult<SignedTransfer> {
        let signature = wallet.sign_hash(&self.tx.signature_hash())?;
        Ok(SignedTransfer {
            from: self.from,
            signed: self.tx.into_signed(signature),
        })
    }
}

/// A signed transfer ready for broadcast.
#[derive(Debug, Clone)]
pub struct SignedTransfer {
    from: Address,
    signed: Signed<TxLegacy>,
}

impl SignedTransfer {
    pub fn from(&self) -> Address {
        self.from
    }

    pub fn hash(&self) -> TxHash {
        *self.signed.hash()
    }

    pub fn signed(&self) -> &Signed<TxLegacy> {
        &self.signed
    }

    /// EIP-2718 encoding suitable for `eth_sendRawTransaction`.
    pub fn encoded(&self) -> Bytes {
        TxEnvelope::Legacy(self.signed.clone()).encoded_2718().into()
    }
}
