//! Bounded backward block scan.
//!
//! Walks blocks from the latest one toward genesis and yields transaction
//! summaries newest-block-first, in each block's native order. The scan stops
//! when the limit is reached or the block number would go below zero.

use futures_util::stream::{self, Stream};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::chain::node::NodeRpc;
use crate::chain::types::{ChainError, ChainResult, TxSummary};
use crate::observability::metrics;

/// Number of transactions collected when no limit is given.
pub const DEFAULT_RECENT_TX_LIMIT: usize = 10;

/// Stopping rule of the scan.
///
/// `block` is `None` once the cursor has stepped below block zero.
pub fn scan_exhausted(block: Option<u64>, collected: usize, limit: usize) -> bool {
    block.is_none() || collected >= limit
}

/// Position of the scan: current block and number of transactions taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanCursor {
    block: Option<u64>,
    collected: usize,
    limit: usize,
}

impl ScanCursor {
    pub fn new(latest: u64, limit: usize) -> Self {
        Self {
            block: Some(latest),
            collected: 0,
            limit,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        scan_exhausted(self.block, self.collected, self.limit)
    }

    /// Block to fetch next, or `None` when the scan is over.
    pub fn current(&self) -> Option<u64> {
        if self.is_exhausted() {
            None
        } else {
            self.block
        }
    }

    pub fn collected(&self) -> usize {
        self.collected
    }

    /// Count one transaction if the limit allows it.
    pub fn try_take(&mut self) -> bool {
        if self.collected >= self.limit {
            return false;
        }
        self.collected += 1;
        true
    }

    /// Move to the previous block. Stepping back from block 0 ends the scan.
    pub fn step_back(&mut self) {
        self.block = self.block.and_then(|b| b.checked_sub(1));
    }

    fn finish(&mut self) {
        self.block = None;
    }
}

/// Lazy producer of recent transaction summaries.
///
/// Not restartable: once it returns `None` or an error it yields nothing more.
pub struct BlockScan {
    node: Arc<dyn NodeRpc>,
    cursor: ScanCursor,
    pending: VecDeque<TxSummary>,
}

impl BlockScan {
    /// Start a scan at the node's latest block.
    pub async fn start(node: Arc<dyn NodeRpc>, limit: usize) -> ChainResult<Self> {
        let latest = node.latest_block_number().await?;
        Ok(Self::from_block(node, latest, limit))
    }

    /// Start a scan at a known block number.
    pub fn from_block(node: Arc<dyn NodeRpc>, latest: u64, limit: usize) -> Self {
        Self {
            node,
            cursor: ScanCursor::new(latest, limit),
            pending: VecDeque::new(),
        }
    }

    /// Next summary, fetching blocks as needed.
    pub async fn next(&mut self) -> ChainResult<Option<TxSummary>> {
        loop {
            if let Some(summary) = self.pending.pop_front() {
                return Ok(Some(summary));
            }
            let Some(number) = self.cursor.current() else {
                return Ok(None);
            };

            let block = match self.node.block_with_transactions(number).await {
                Ok(block) => block,
                Err(e) => {
                    self.cursor.finish();
                    return Err(e.into());
                }
            };
            metrics::record_scanned_block();

            let available = block.transactions.len();
            for tx in block.transactions {
                if !self.cursor.try_take() {
                    break;
                }
                self.pending.push_back(TxSummary::from_node(number, tx));
            }
            tracing::trace!(
                block = number,
                available,
                taken = self.pending.len(),
                collected = self.cursor.collected(),
                "Scanned block"
            );

            self.cursor.step_back();
        }
    }

    /// Turn the scan into a stream that ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = ChainResult<TxSummary>> + Send {
        stream::try_unfold(self, |mut scan| async move {
            let next = scan.next().await?;
            Ok::<_, ChainError>(next.map(|summary| (summary, scan)))
        })
    }
}
