//! Structured logging.
//!
//! `RUST_LOG` takes precedence; otherwise the configured level applies to the
//! gateway and its HTTP middleware.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    format!("chain_gateway={level},gateway_cli={level},tower_http={level}")
}

/// Install the global tracing subscriber.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(level).into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
