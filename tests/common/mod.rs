//! Shared utilities for integration tests.

use alloy::primitives::keccak256;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use chain_gateway::{ChainClient, GatewayConfig, HttpServer, Shutdown};

/// One JSON-RPC call received by the mock node.
#[derive(Debug, Clone)]
pub struct RpcCall {
    pub method: String,
    pub params: Value,
}

#[derive(Clone, Default)]
struct MockRpcState {
    calls: Arc<Mutex<Vec<RpcCall>>>,
    reject_broadcast: Option<&'static str>,
    /// Block `n` is served from index `n`; `null` entries are unknown blocks.
    blocks: Arc<Vec<Value>>,
}

/// Handle to a running mock JSON-RPC node.
pub struct MockRpcNode {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<RpcCall>>>,
}

#[allow(dead_code)]
impl MockRpcNode {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<RpcCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.method).collect()
    }
}

/// Start a mock node answering the read and broadcast methods the gateway uses.
///
/// Chain id 1337, latest block 42, every balance 1 unit, nonce 3, gas price 1 gwei.
/// `eth_getBlockByNumber` is not served.
pub async fn start_mock_node(reject_broadcast: Option<&'static str>) -> MockRpcNode {
    serve(MockRpcState {
        calls: Arc::default(),
        reject_broadcast,
        blocks: Arc::default(),
    })
    .await
}

/// Start a mock node serving `blocks` as the whole chain.
///
/// The latest block is the last entry. Other methods answer as in
/// [`start_mock_node`].
#[allow(dead_code)]
pub async fn start_mock_chain(blocks: Vec<Value>) -> MockRpcNode {
    serve(MockRpcState {
        calls: Arc::default(),
        reject_broadcast: None,
        blocks: Arc::new(blocks),
    })
    .await
}

async fn serve(state: MockRpcState) -> MockRpcNode {
    let calls = state.calls.clone();

    let app = Router::new().route("/", post(rpc_handler)).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockRpcNode { addr, calls }
}

async fn rpc_handler(
    State(state): State<MockRpcState>,
    Json(request): Json<Value>,
) -> Json<Value> {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let params = request["params"].clone();
    state.calls.lock().unwrap().push(RpcCall {
        method: method.clone(),
        params: params.clone(),
    });

    let result = match method.as_str() {
        "eth_blockNumber" if !state.blocks.is_empty() => {
            quantity(state.blocks.len() as u64 - 1)
        }
        "eth_blockNumber" => json!("0x2a"),
        "eth_getBlockByNumber" if !state.blocks.is_empty() => {
            let number = params[0]
                .as_str()
                .and_then(|n| u64::from_str_radix(n.trim_start_matches("0x"), 16).ok())
                .unwrap_or(u64::MAX);
            state
                .blocks
                .get(number as usize)
                .cloned()
                .unwrap_or(Value::Null)
        }
        "eth_chainId" => json!("0x539"),
        "eth_getBalance" => json!("0xde0b6b3a7640000"),
        "eth_getTransactionCount" => json!("0x3"),
        "eth_gasPrice" => json!("0x3b9aca00"),
        "eth_sendRawTransaction" => {
            if let Some(reason) = state.reject_broadcast {
                return rpc_error(id, -32000, reason);
            }
            let raw = params[0].as_str().unwrap_or_default();
            let bytes = alloy::hex::decode(raw).unwrap_or_default();
            json!(keccak256(&bytes))
        }
        _ => return rpc_error(id, -32601, "method not found"),
    };

    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

fn rpc_error(id: Value, code: i64, message: &str) -> Json<Value> {
    Json(json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message }
    }))
}

fn quantity(n: impl Into<u128>) -> Value {
    json!(format!("{:#x}", n.into()))
}

fn word(tag: u8, n: u64) -> String {
    format!("0x{:02x}{:062x}", tag, n)
}

/// A mined block in the shape geth returns for `eth_getBlockByNumber(n, true)`.
#[allow(dead_code)]
pub fn block_json(number: u64, transactions: Vec<Value>) -> Value {
    json!({
        "number": quantity(number),
        "hash": word(0xb1, number),
        "parentHash": word(0xb1, number.saturating_sub(1)),
        "sha3Uncles": "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347",
        "miner": "0x0000000000000000000000000000000000000000",
        "stateRoot": word(0x5a, number),
        "transactionsRoot": word(0x7a, number),
        "receiptsRoot": word(0x9a, number),
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "difficulty": "0x0",
        "gasLimit": "0x1c9c380",
        "gasUsed": "0x0",
        "timestamp": quantity(1_700_000_000 + number * 12),
        "extraData": "0x",
        "mixHash": word(0x3a, number),
        "nonce": "0x0000000000000000",
        "baseFeePerGas": "0x3b9aca00",
        "size": "0x220",
        "uncles": [],
        "transactions": transactions,
    })
}

/// Same block, but with transaction hashes in place of bodies.
#[allow(dead_code)]
pub fn hashes_only_block_json(number: u64) -> Value {
    let mut block = block_json(number, Vec::new());
    block["transactions"] = json!([word(0x70, number)]);
    block
}

/// Legacy EIP-155 transfer of `value` base units at a 1 gwei gas price.
#[allow(dead_code)]
pub fn legacy_transfer_json(block: u64, index: u64, to: &str, value: u128) -> Value {
    json!({
        "type": "0x0",
        "blockHash": word(0xb1, block),
        "blockNumber": quantity(block),
        "transactionIndex": quantity(index),
        "hash": word(0x70, block * 100 + index),
        "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
        "to": to,
        "nonce": quantity(block * 100 + index),
        "gas": "0x5208",
        "gasPrice": "0x3b9aca00",
        "value": quantity(value),
        "input": "0x",
        "chainId": "0x539",
        "v": "0xa95",
        "r": word(0x11, block * 100 + index),
        "s": word(0x22, block * 100 + index),
    })
}

/// Dynamic-fee contract creation with a 2 gwei fee cap and a 1 gwei tip.
#[allow(dead_code)]
pub fn contract_creation_json(block: u64, index: u64) -> Value {
    json!({
        "type": "0x2",
        "blockHash": word(0xb1, block),
        "blockNumber": quantity(block),
        "transactionIndex": quantity(index),
        "hash": word(0x70, block * 100 + index),
        "from": "0x70997970c51812dc3a010c7d01b50e0d17dc79c8",
        "to": null,
        "nonce": quantity(block * 100 + index),
        "gas": "0x30d40",
        "maxFeePerGas": "0x77359400",
        "maxPriorityFeePerGas": "0x3b9aca00",
        "value": "0x0",
        "input": "0x6080",
        "accessList": [],
        "chainId": "0x539",
        "v": "0x0",
        "yParity": "0x0",
        "r": word(0x33, block * 100 + index),
        "s": word(0x44, block * 100 + index),
    })
}

/// Start the gateway against `rpc_url` on an ephemeral port.
pub async fn start_gateway(rpc_url: String) -> (SocketAddr, Shutdown) {
    let mut config = GatewayConfig::default();
    config.node.rpc_url = rpc_url;
    config.node.rpc_timeout_secs = Some(5);

    let client = ChainClient::connect(&config.node).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.signal();
    tokio::spawn(async move {
        let _ = HttpServer::new(&config, client)
            .run(listener, server_shutdown)
            .await;
    });

    (addr, shutdown)
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
