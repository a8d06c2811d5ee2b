//! Chain data source used by the window fetcher.

use async_trait::async_trait;
use usechain_rpc_client::{RpcBlock, RpcClient, RpcError};

/// Per-block fields read by the aggregator. Valid only for the cycle that
/// fetched it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockRecord {
    pub height: u64,
    /// Unix seconds
    pub timestamp: i64,
    /// Bytes
    pub size: i64,
    pub tx_count: i64,
}

impl BlockRecord {
    /// Record standing in for a block whose fetch failed.
    pub fn zeroed(height: u64) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }
}

impl From<&RpcBlock> for BlockRecord {
    fn from(block: &RpcBlock) -> Self {
        Self {
            height: block.number,
            timestamp: saturating_i64(block.timestamp),
            size: saturating_i64(block.size),
            tx_count: saturating_i64(block.transaction_count() as u64),
        }
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// The three chain queries a collection cycle issues. Calls are awaited one
/// at a time; timeouts belong to the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Latest chain height.
    async fn current_height(&self) -> Result<u64, RpcError>;

    /// Block at `height`.
    async fn block_by_height(&self, height: u64, include_tx: bool) -> Result<BlockRecord, RpcError>;

    /// Transaction count of the block at `height`.
    async fn tx_count_by_height(&self, height: u64) -> Result<u64, RpcError>;
}

#[async_trait]
impl BlockSource for RpcClient {
    async fn current_height(&self) -> Result<u64, RpcError> {
        self.block_number().await
    }

    async fn block_by_height(&self, height: u64, include_tx: bool) -> Result<BlockRecord, RpcError> {
        let block = self.get_block_by_number(height, include_tx).await?;
        Ok(BlockRecord::from(&block))
    }

    async fn tx_count_by_height(&self, height: u64) -> Result<u64, RpcError> {
        self.get_block_transaction_count_by_number(height).await
    }
}
