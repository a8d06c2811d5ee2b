//! Block-height window selection and sequential fetch.

use std::ops::Range;

use tracing::{debug, warn};
use usechain_config::WINDOW_SIZE;
use usechain_rpc_client::RpcError;

use crate::error::{CollectError, CollectResult};
use crate::source::{BlockRecord, BlockSource};

/// Heights sampled in one cycle. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: u64,
    pub end: u64,
}

impl Window {
    /// The window ending at the chain head `end`, clamped at genesis.
    pub fn ending_at(end: u64) -> Self {
        Self {
            start: end.saturating_sub(WINDOW_SIZE),
            end,
        }
    }

    /// Number of block intervals in the window.
    pub fn slot(&self) -> u64 {
        self.end - self.start
    }

    /// Heights visited by the fetch loop, `[start, end)`.
    pub fn heights(&self) -> Range<u64> {
        self.start..self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One loop iteration: the transaction count at `height` plus the blocks at
/// `height` and `height + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSample {
    pub height: u64,
    pub tx_count: i64,
    pub before: BlockRecord,
    pub after: BlockRecord,
}

/// Everything fetched for one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedWindow {
    pub window: Window,
    pub start_block: BlockRecord,
    pub end_block: BlockRecord,
    pub samples: Vec<WindowSample>,
    /// Fetches that failed and were replaced by zero values
    pub fetch_failures: u64,
}

/// Reads the head height and fetches the window ending there.
///
/// Only the head-height call is fatal. Every other failed call is logged,
/// counted and replaced by a zero value.
pub async fn fetch_window(source: &dyn BlockSource) -> CollectResult<FetchedWindow> {
    let end = source
        .current_height()
        .await
        .map_err(CollectError::HeadHeight)?;
    let window = Window::ending_at(end);
    debug!(start = window.start, end = window.end, "fetching block window");
    Ok(fetch_range(source, window).await)
}

/// Fetches the blocks and transaction counts of `window`, one call at a time.
pub async fn fetch_range(source: &dyn BlockSource, window: Window) -> FetchedWindow {
    let mut failures = 0u64;

    let start_block = block_or_zero(source, window.start, &mut failures).await;
    let end_block = block_or_zero(source, window.end, &mut failures).await;

    let mut samples = Vec::with_capacity(window.slot() as usize);
    for height in window.heights() {
        let tx_count = tx_count_or_zero(source, height, &mut failures).await;
        let before = block_or_zero(source, height, &mut failures).await;
        let after = block_or_zero(source, height + 1, &mut failures).await;
        samples.push(WindowSample {
            height,
            tx_count,
            before,
            after,
        });
    }

    if failures > 0 {
        warn!(
            start = window.start,
            end = window.end,
            failures,
            "block window fetched with failures, statistics are skewed"
        );
    }

    FetchedWindow {
        window,
        start_block,
        end_block,
        samples,
        fetch_failures: failures,
    }
}

async fn block_or_zero(source: &dyn BlockSource, height: u64, failures: &mut u64) -> BlockRecord {
    match source.block_by_height(height, false).await {
        Ok(block) => block,
        Err(err) => {
            note_failure("block_by_height", height, &err, failures);
            BlockRecord::zeroed(height)
        }
    }
}

async fn tx_count_or_zero(source: &dyn BlockSource, height: u64, failures: &mut u64) -> i64 {
    match source.tx_count_by_height(height).await {
        Ok(count) => i64::try_from(count).unwrap_or(i64::MAX),
        Err(err) => {
            note_failure("tx_count_by_height", height, &err, failures);
            0
        }
    }
}

fn note_failure(call: &'static str, height: u64, err: &RpcError, failures: &mut u64) {
    *failures += 1;
    warn!(call, height, error = %err, "block fetch failed, using zero value");
}
