//! Etherscan-compatible API provider

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;

use super::client::ChainDataClient;
use crate::config::AppConfig;
use crate::domain::models::RawTransaction;
use crate::infrastructure::chain::error::ChainClientError;
use crate::utils::logging;

/// Most rows the `txlist` endpoint returns for one query
const MAX_RESULTS_PER_QUERY: usize = 10_000;

/// Client for an Etherscan-style account API
#[derive(Debug)]
pub struct EtherscanClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl EtherscanClient {
    /// Create a new client from the application config
    pub fn new(config: &AppConfig) -> Result<Self, ChainClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.chain.request_timeout_secs.max(1)))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| {
                ChainClientError::ResponseError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_url: config.chain.url.clone(),
            api_key: config.chain.api_key.clone(),
        })
    }

    async fn get(&self, params: &[(&str, String)]) -> Result<Value, ChainClientError> {
        let mut query: Vec<(&str, String)> = params.to_vec();
        if !self.api_key.is_empty() {
            query.push(("apikey", self.api_key.clone()));
        }

        let response = self.client.get(&self.api_url).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChainClientError::ApiError(format!(
                "API returned error status: {}",
                status
            )));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// One `txlist` query; may be truncated at [`MAX_RESULTS_PER_QUERY`]
    async fn get_transaction_page(
        &self,
        address: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<RawTransaction>, ChainClientError> {
        let body = self
            .get(&[
                ("module", "account".to_string()),
                ("action", "txlist".to_string()),
                ("address", address.to_string()),
                ("startblock", from_block.to_string()),
                ("endblock", to_block.to_string()),
                ("sort", "asc".to_string()),
            ])
            .await?;

        parse_txlist_response(body)
    }
}

#[async_trait]
impl ChainDataClient for EtherscanClient {
    fn provider_name(&self) -> String {
        "Etherscan".to_string()
    }

    async fn get_latest_block_number(&self) -> Result<u64, ChainClientError> {
        let body = self
            .get(&[
                ("module", "proxy".to_string()),
                ("action", "eth_blockNumber".to_string()),
            ])
            .await?;

        parse_block_number_response(&body)
    }

    async fn get_transactions(
        &self,
        address: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<RawTransaction>, ChainClientError> {
        let mut transactions = Vec::new();
        let mut seen = HashSet::new();
        let mut start = from_block;

        loop {
            let page = self.get_transaction_page(address, start, to_block).await?;
            let truncated = page.len() >= MAX_RESULTS_PER_QUERY;
            let last_block = page
                .last()
                .and_then(|tx| tx.block_number.parse::<u64>().ok());

            for tx in incoming_only(page, address) {
                if seen.insert(tx.hash.clone()) {
                    transactions.push(tx);
                }
            }

            // A full page may have cut a block short, so the next query
            // starts at the last block seen rather than after it
            match last_block {
                Some(next) if truncated && next > start => {
                    logging::log_debug(&format!(
                        "[etherscan] Result limit reached, continuing from block {}",
                        next
                    ));
                    start = next;
                }
                _ if truncated => {
                    logging::log_warning(&format!(
                        "[etherscan] More than {} transactions in block {}; remaining ones are not listed",
                        MAX_RESULTS_PER_QUERY, start
                    ));
                    break;
                }
                _ => break,
            }
        }

        Ok(transactions)
    }
}

fn parse_txlist_response(body: Value) -> Result<Vec<RawTransaction>, ChainClientError> {
    let status = body.get("status").and_then(Value::as_str).unwrap_or("");
    let message = body.get("message").and_then(Value::as_str).unwrap_or("");

    match body.get("result") {
        Some(Value::Array(items)) => {
            if status == "0" && !items.is_empty() {
                return Err(ChainClientError::ApiError(message.to_string()));
            }
            items
                .iter()
                .map(|item| serde_json::from_value(item.clone()).map_err(ChainClientError::from))
                .collect()
        }
        Some(Value::String(reason)) => Err(ChainClientError::ApiError(format!(
            "{}: {}",
            message, reason
        ))),
        _ => Err(ChainClientError::ResponseError(
            "No result in txlist response".to_string(),
        )),
    }
}

/// `txlist` lists transfers in both directions; keep the ones sent to `address`
fn incoming_only(transactions: Vec<RawTransaction>, address: &str) -> Vec<RawTransaction> {
    transactions
        .into_iter()
        .filter(|tx| tx.to.eq_ignore_ascii_case(address))
        .collect()
}

fn parse_block_number_response(body: &Value) -> Result<u64, ChainClientError> {
    if let Some(error) = body.get("error") {
        return Err(ChainClientError::ApiError(error.to_string()));
    }

    let result = body
        .get("result")
        .and_then(Value::as_str)
        .ok_or_else(|| ChainClientError::ResponseError("No result in response".to_string()))?;

    let digits = result.strip_prefix("0x").ok_or_else(|| {
        // Rate limiting and key errors come back as plain text results
        ChainClientError::ApiError(result.to_string())
    })?;

    u64::from_str_radix(digits, 16).map_err(|e| {
        ChainClientError::ResponseError(format!("Invalid block number {}: {}", result, e))
    })
}
