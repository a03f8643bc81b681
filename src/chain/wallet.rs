//! Private key handling for a single transfer request.
//!
//! # Security
//! - A wallet lives only for the duration of one transfer
//! - Keys are never logged or serialized; `Debug` shows the address only

use alloy::primitives::{Address, Signature, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use crate::chain::types::{ChainError, ChainResult};

/// Environment variable read by `gateway-cli` for the sender key.
pub const PRIVATE_KEY_ENV_VAR: &str = "GATEWAY_PRIVATE_KEY";

/// Signing key and the address derived from it.
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Parse a hex-encoded private key (with or without `0x` prefix).
    ///
    /// Fails with [`ChainError::KeyParse`] on malformed hex or an invalid scalar.
    pub fn from_private_key(private_key_hex: &str) -> ChainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| ChainError::KeyParse(format!("Invalid private key format: {}", e)))?;

        Ok(Self { signer })
    }

    /// Address derived from the key's public key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a 32-byte prehash.
    pub fn sign_hash(&self, hash: &B256) -> ChainResult<Signature> {
        self.signer
            .sign_hash_sync(hash)
            .map_err(|e| ChainError::Signing(e.to_string()))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
