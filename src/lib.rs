//! HTTP gateway over a blockchain node's JSON-RPC interface.
//!
//! Reads chain state (latest height, chain id, balances, recent transactions)
//! and submits signed native-currency transfers.

pub mod chain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use chain::ChainClient;
pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
