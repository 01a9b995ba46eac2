use async_trait::async_trait;

use crate::domain::models::{DecodedTransaction, RawTransaction};
use crate::infrastructure::chain::decoder;
use crate::infrastructure::chain::error::ChainClientError;

/// Source of transactions sent to the donation address
#[async_trait]
pub trait ChainDataClient: Send + Sync + std::fmt::Debug {
    /// Get the provider name for identification
    fn provider_name(&self) -> String;

    /// Number of the current chain head
    async fn get_latest_block_number(&self) -> Result<u64, ChainClientError>;

    /// Transactions to `address` in the inclusive block range, undecoded
    async fn get_transactions(
        &self,
        address: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<RawTransaction>, ChainClientError>;

    /// Decode input data into memos, dropping failed, empty and unparseable
    /// transactions
    fn decode_input_data(&self, transactions: Vec<RawTransaction>) -> Vec<DecodedTransaction> {
        decoder::decode_input_data(transactions)
    }
}
