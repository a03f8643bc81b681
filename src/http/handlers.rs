//! Endpoint handlers.
//!
//! Each handler validates its parameters, calls the [`ChainClient`] and renders
//! the result as plain text. Errors become an `Error: <message>` line.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::time::Instant;

use crate::chain::units::parse_amount;
use crate::chain::{ChainClient, ChainError};
use crate::http::render;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub client: ChainClient,
    pub recent_tx_limit: usize,
}

/// Error rendered as a plain-text `Error:` line.
#[derive(Debug)]
pub struct ErrorReply {
    status: StatusCode,
    message: String,
}

impl ErrorReply {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<ChainError> for ErrorReply {
    fn from(err: ChainError) -> Self {
        let status = match &err {
            ChainError::Connection(_) | ChainError::Broadcast { .. } => StatusCode::BAD_GATEWAY,
            ChainError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ChainError::KeyParse(_)
            | ChainError::Conversion(_)
            | ChainError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ErrorReply {
    fn into_response(self) -> Response {
        (self.status, render::error(&self.message)).into_response()
    }
}

type Reply = Result<String, ErrorReply>;

fn finish(
    endpoint: &'static str,
    start: Instant,
    result: Result<String, impl Into<ErrorReply>>,
) -> Reply {
    let reply = result.map(|body| format!("{}\n", body)).map_err(Into::into);
    metrics::record_request(endpoint, reply.is_ok(), start);
    if let Err(e) = &reply {
        tracing::warn!(endpoint, status = %e.status, error = %e.message, "Request failed");
    }
    reply
}

#[derive(Debug, Deserialize)]
pub struct BalanceParams {
    pub acc: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransferParams {
    #[serde(rename = "pkeyFrom")]
    pub pkey_from: Option<String>,
    #[serde(rename = "accTo")]
    pub acc_to: Option<String>,
    pub amount: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn latest_block(State(state): State<AppState>) -> Reply {
    let start = Instant::now();
    let result = state.client.latest_height().await.map(render::latest_height);
    finish("latestBlock", start, result)
}

pub async fn chain_id(State(state): State<AppState>) -> Reply {
    let start = Instant::now();
    let result = state.client.chain_id().await.map(render::chain_id);
    finish("chainID", start, result)
}

pub async fn last_transactions(State(state): State<AppState>) -> Reply {
    let start = Instant::now();
    let result = state
        .client
        .recent_transactions(state.recent_tx_limit)
        .await
        .map(|txs| render::transactions(&txs));
    finish("last10tx", start, result)
}

pub async fn balance(
    State(state): State<AppState>,
    Query(params): Query<BalanceParams>,
) -> Reply {
    let start = Instant::now();
    let Some(acc) = non_empty(params.acc) else {
        let missing = ErrorReply::bad_request("missing acc parameter");
        return finish("balance", start, Err(missing));
    };
    let result = state.client.balance(&acc).await.map(|b| render::balance(&b));
    finish("balance", start, result)
}

pub async fn send_eth(
    State(state): State<AppState>,
    Query(params): Query<TransferParams>,
) -> Reply {
    let start = Instant::now();
    let (Some(pkey), Some(acc_to), Some(amount)) = (
        non_empty(params.pkey_from),
        non_empty(params.acc_to),
        non_empty(params.amount),
    ) else {
        return finish(
            "sendEth",
            start,
            Err(ErrorReply::bad_request(
                "missing 'pkeyFrom' or 'accTo' or 'amount' parameter",
            )),
        );
    };

    let result = match parse_amount(&amount) {
        Ok(amount) => state
            .client
            .send_transfer(&pkey, &acc_to, amount)
            .await
            .map(|receipt| render::transfer(&receipt)),
        Err(e) => Err(e),
    };
    finish("sendEth", start, result)
}
