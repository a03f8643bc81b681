//! Plain-text rendering of chain results.
//!
//! Multi-field results are blocks of `key: value` lines between `===` lines.

use std::fmt::Write;

use crate::chain::{BalanceSummary, ChainId, TransferReceipt, TxSummary};

/// Destination shown for contract-creation transactions.
pub const CONTRACT_CREATION: &str = "contract-creation";

const SENTINEL: &str = "===";

#[derive(Default)]
struct TextBlock {
    out: String,
}

impl TextBlock {
    fn open(mut self) -> Self {
        self.out.push_str(SENTINEL);
        self.out.push('\n');
        self
    }

    fn line(mut self, key: &str, value: impl std::fmt::Display) -> Self {
        let _ = writeln!(self.out, "{}: {}", key, value);
        self
    }

    fn close(self) -> String {
        self.open().out
    }
}

pub fn latest_height(height: u64) -> String {
    height.to_string()
}

pub fn chain_id(chain_id: ChainId) -> String {
    chain_id.to_string()
}

pub fn balance(summary: &BalanceSummary) -> String {
    TextBlock::default()
        .open()
        .line("wallet", summary.address)
        .line("balance", summary.balance)
        .line("balanceEth", &summary.balance_display)
        .close()
}

pub fn transaction(tx: &TxSummary) -> String {
    let to = tx
        .to
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| CONTRACT_CREATION.to_string());

    TextBlock::default()
        .open()
        .line("txHash", tx.hash)
        .line("block", tx.block_number)
        .line("txValue", tx.value)
        .line("txValueEth", &tx.value_display)
        .line("txGas", tx.gas_limit)
        .line("txGasPrice", tx.gas_price)
        .line("txData", String::from_utf8_lossy(&tx.input))
        .line("txTo", to)
        .close()
}

pub fn transactions(txs: &[TxSummary]) -> String {
    txs.iter().map(transaction).collect()
}

pub fn transfer(receipt: &TransferReceipt) -> String {
    TextBlock::default()
        .open()
        .line("result", "success")
        .line("tx hash", receipt.tx_hash)
        .line("from", receipt.from)
        .line("nonce", receipt.nonce)
        .close()
}

pub fn error(message: impl std::fmt::Display) -> String {
    format!("Error: {}\n", message)
}
