//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section has defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::chain::DEFAULT_RECENT_TX_LIMIT;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP listener settings.
    pub listener: ListenerConfig,

    /// Node JSON-RPC endpoint.
    pub node: NodeConfig,

    /// Recent transaction scan settings.
    pub scan: ScanConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:12345").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:12345".to_string(),
        }
    }
}

/// Node connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Per-call timeout in seconds. Unset means calls wait on the node.
    pub rpc_timeout_secs: Option<u64>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:9545".to_string(),
            rpc_timeout_secs: None,
        }
    }
}

/// Backward block scan configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Transactions returned by `/last10tx`.
    pub recent_tx_limit: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recent_tx_limit: DEFAULT_RECENT_TX_LIMIT,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
