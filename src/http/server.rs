//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all endpoint handlers
//! - Wire up middleware (request ID, tracing)
//! - Serve on a listener until shutdown is signalled

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::chain::ChainClient;
use crate::config::GatewayConfig;
use crate::http::handlers::{self, AppState};
use crate::http::request::{make_request_span, UuidRequestId};
use crate::lifecycle::ShutdownSignal;

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/latestBlock", get(handlers::latest_block))
        .route("/last10tx", get(handlers::last_transactions))
        .route("/balance", get(handlers::balance))
        .route("/sendEth", get(handlers::send_eth).post(handlers::send_eth))
        .route("/chainID", get(handlers::chain_id))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server whose handlers share `client`.
    pub fn new(config: &GatewayConfig, client: ChainClient) -> Self {
        let state = AppState {
            client,
            recent_tx_limit: config.scan.recent_tx_limit,
        };
        Self {
            router: build_router(state),
        }
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
