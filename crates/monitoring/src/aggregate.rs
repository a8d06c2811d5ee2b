//! Folds a fetched window into throughput, delay and size statistics.
//!
//! All arithmetic is signed 64-bit integer arithmetic and every ratio
//! truncates toward zero. A ratio whose denominator is zero is reported as
//! `0`; this happens when the chain has not advanced (`slot == 0`) or the
//! window's first and last blocks share a timestamp (`total_time == 0`).

use tracing::debug;

use crate::window::FetchedWindow;

/// Statistics for one window, recomputed from scratch every cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    /// Chain head height, the window end
    pub height: u64,
    /// Transactions in blocks `[start, end)`
    pub total_tx: i64,
    /// Seconds between the first and last block of the window
    pub total_time: i64,
    /// `total_tx / total_time`
    pub tps: i64,
    /// `total_time / slot`
    pub avg_delay: i64,
    /// Largest gap between consecutive block timestamps
    pub max_delay: i64,
    /// `total_size / slot`, sizes taken from blocks `(start, end]`
    pub avg_size: i64,
    /// Largest block in `(start, end]`
    pub max_size: i64,
    /// `total_tx / slot`
    pub avg_tx_per_block: i64,
}

impl AggregateStats {
    /// Values in emission order.
    pub fn in_emit_order(&self) -> [i64; 9] {
        [
            i64::try_from(self.height).unwrap_or(i64::MAX),
            self.total_tx,
            self.total_time,
            self.tps,
            self.avg_delay,
            self.max_delay,
            self.avg_size,
            self.max_size,
            self.avg_tx_per_block,
        ]
    }
}

/// Computes the window statistics.
///
/// Block sizes and delays are attributed to the block *after* each sampled
/// height: iteration `i` contributes the size of block `i + 1` and the gap
/// `timestamp(i + 1) - timestamp(i)`.
pub fn aggregate(fetched: &FetchedWindow) -> AggregateStats {
    let slot = fetched.window.slot() as i64;
    let total_time = fetched.end_block.timestamp - fetched.start_block.timestamp;

    let mut total_tx = 0i64;
    let mut total_size = 0i64;
    let mut max_size = 0i64;
    let mut max_delay = 0i64;

    for sample in &fetched.samples {
        total_tx = total_tx.saturating_add(sample.tx_count);
        total_size = total_size.saturating_add(sample.after.size);
        max_size = max_size.max(sample.after.size);
        max_delay = max_delay.max(sample.after.timestamp - sample.before.timestamp);
    }

    if slot == 0 || total_time == 0 {
        debug!(
            height = fetched.window.end,
            slot,
            total_time,
            "degenerate block window, ratios reported as zero"
        );
    }

    AggregateStats {
        height: fetched.window.end,
        total_tx,
        total_time,
        tps: ratio(total_tx, total_time),
        avg_delay: ratio(total_time, slot),
        max_delay,
        avg_size: ratio(total_size, slot),
        max_size,
        avg_tx_per_block: ratio(total_tx, slot),
    }
}

/// Truncating division with `0` for a zero denominator.
fn ratio(numerator: i64, denominator: i64) -> i64 {
    numerator.checked_div(denominator).unwrap_or(0)
}
