//! Chain interaction subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → client.rs (ChainClient: reads, transfer orchestration)
//!     → scan.rs (bounded backward block scan)
//!     → wallet.rs + transfer.rs (key parsing, build, sign)
//!     → node.rs (NodeRpc port, alloy JSON-RPC implementation)
//! ```
//!
//! # Security Constraints
//! - Private keys arrive per request and are dropped when the request ends
//! - Never log private keys or sensitive data
//! - Amounts stay in base units for anything that reaches a transaction

pub mod client;
pub mod node;
pub mod scan;
pub mod transfer;
pub mod types;
pub mod units;
pub mod wallet;

#[cfg(test)]
pub(crate) mod mock;

pub use client::ChainClient;
pub use node::{AlloyNode, NodeBlock, NodeError, NodeRpc, NodeTransaction};
pub use scan::{BlockScan, ScanCursor, DEFAULT_RECENT_TX_LIMIT};
pub use types::{BalanceSummary, ChainError, ChainId, ChainResult, TransferReceipt, TxSummary};
pub use wallet::Wallet;
