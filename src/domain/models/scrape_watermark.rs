use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A block recorded as fully scraped.
///
/// Only the highest recorded block number matters for resuming; older rows
/// are kept as a scrape history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeWatermark {
    pub block_number: u64,
    /// Qualifying donations found by the pass that recorded this block
    pub transactions_found: u32,
    /// Last time this row was written
    pub scraped_at: DateTime<Utc>,
}
