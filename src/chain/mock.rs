//! In-memory [`NodeRpc`] used by unit tests.

use alloy::primitives::{keccak256, Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::chain::node::{NodeBlock, NodeError, NodeResult, NodeRpc, NodeTransaction};

#[derive(Default)]
struct MockState {
    blocks: BTreeMap<u64, NodeBlock>,
    failing_blocks: HashSet<u64>,
    failing_methods: HashSet<&'static str>,
    calls: Vec<&'static str>,
    balances: BTreeMap<Address, U256>,
    nonce: u64,
    gas_price: u128,
    chain_id: u64,
    sent: Vec<Bytes>,
}

/// Scriptable node: blocks, balances and per-method failures.
#[derive(Default)]
pub(crate) struct MockNode {
    state: Mutex<MockState>,
}

impl MockNode {
    pub fn new() -> Arc<Self> {
        let node = Self::default();
        {
            let mut state = node.state.lock().unwrap();
            state.chain_id = 1337;
            state.gas_price = 2_000_000_000;
        }
        Arc::new(node)
    }

    /// Chain with `(block number, transaction count)` pairs.
    pub fn with_chain(blocks: impl IntoIterator<Item = (u64, usize)>) -> Arc<Self> {
        let node = Self::new();
        {
            let mut state = node.state.lock().unwrap();
            for (number, count) in blocks {
                let transactions = (0..count).map(|i| sample_tx(number, i)).collect();
                state.blocks.insert(number, NodeBlock { number, transactions });
            }
        }
        node
    }

    pub fn block(&self, number: u64) -> NodeBlock {
        self.state.lock().unwrap().blocks[&number].clone()
    }

    pub fn fail_block(&self, number: u64) {
        self.state.lock().unwrap().failing_blocks.insert(number);
    }

    pub fn fail(&self, method: &'static str) {
        self.state.lock().unwrap().failing_methods.insert(method);
    }

    pub fn make_contract_creation(&self, number: u64, index: usize) {
        let mut state = self.state.lock().unwrap();
        if let Some(block) = state.blocks.get_mut(&number) {
            block.transactions[index].to = None;
        }
    }

    pub fn set_balance(&self, address: Address, balance: U256) {
        self.state.lock().unwrap().balances.insert(address, balance);
    }

    pub fn set_nonce(&self, nonce: u64) {
        self.state.lock().unwrap().nonce = nonce;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn block_fetches(&self) -> usize {
        self.calls()
            .iter()
            .filter(|m| **m == "eth_getBlockByNumber")
            .count()
    }

    pub fn sent(&self) -> Vec<Bytes> {
        self.state.lock().unwrap().sent.clone()
    }

    fn record(&self, method: &'static str) -> NodeResult<std::sync::MutexGuard<'_, MockState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(method);
        if state.failing_methods.contains(method) {
            return Err(NodeError::Rpc(format!("{} unavailable", method)));
        }
        Ok(state)
    }
}

fn sample_tx(block: u64, index: usize) -> NodeTransaction {
    let mut seed = block.to_be_bytes().to_vec();
    seed.extend_from_slice(&(index as u64).to_be_bytes());
    NodeTransaction {
        hash: TxHash::from(keccak256(&seed)),
        to: Some(Address::with_last_byte(index as u8 + 1)),
        value: U256::from(block * 1_000 + index as u64),
        gas_limit: 21_000,
        gas_price: 1_000_000_000,
        input: Bytes::new(),
    }
}

#[async_trait]
impl NodeRpc for MockNode {
    async fn latest_block_number(&self) -> NodeResult<u64> {
        let state = self.record("eth_blockNumber")?;
        Ok(state.blocks.keys().next_back().copied().unwrap_or(0))
    }

    async fn block_with_transactions(&self, number: u64) -> NodeResult<NodeBlock> {
        let state = self.record("eth_getBlockByNumber")?;
        if state.failing_blocks.contains(&number) {
            return Err(NodeError::Rpc(format!("block {} fetch failed", number)));
        }
        state
            .blocks
            .get(&number)
            .cloned()
            .ok_or(NodeError::MissingBlock(number))
    }

    async fn balance(&self, address: Address) -> NodeResult<U256> {
        let state = self.record("eth_getBalance")?;
        Ok(state.balances.get(&address).copied().unwrap_or_default())
    }

    async fn pending_nonce(&self, _address: Address) -> NodeResult<u64> {
        Ok(self.record("eth_getTransactionCount")?.nonce)
    }

    async fn gas_price(&self) -> NodeResult<u128> {
        Ok(self.record("eth_gasPrice")?.gas_price)
    }

    async fn chain_id(&self) -> NodeResult<u64> {
        Ok(self.record("eth_chainId")?.chain_id)
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> NodeResult<TxHash> {
        let mut state = self.record("eth_sendRawTransaction")?;
        let hash = keccak256(&raw);
        state.sent.push(raw);
        Ok(hash)
    }
}
