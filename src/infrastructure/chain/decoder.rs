//! Turns raw API transactions into text memos

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::domain::models::{DecodedTransaction, RawTransaction};
use crate::utils::logging;

/// Decode every transaction, dropping the ones that failed on chain or whose
/// input is empty or not UTF-8 text
pub fn decode_input_data(transactions: Vec<RawTransaction>) -> Vec<DecodedTransaction> {
    let total = transactions.len();
    let decoded: Vec<DecodedTransaction> = transactions
        .iter()
        .filter_map(|tx| match decode_transaction(tx) {
            Ok(decoded) => Some(decoded),
            Err(reason) => {
                logging::log_debug(&format!("[decoder] Dropping {}: {}", tx.hash, reason));
                None
            }
        })
        .collect();

    logging::log_debug(&format!(
        "[decoder] Decoded {} of {} transactions",
        decoded.len(),
        total
    ));
    decoded
}

/// Decode one transaction
pub fn decode_transaction(tx: &RawTransaction) -> Result<DecodedTransaction, String> {
    if tx.is_failed() {
        return Err("transaction failed on chain".to_string());
    }

    let decoded_raw_input = decode_input_message(&tx.input)?;

    let value = Decimal::from_str(tx.value.trim())
        .map_err(|e| format!("invalid value '{}': {}", tx.value, e))?;
    let block_number = tx
        .block_number
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid block number '{}': {}", tx.block_number, e))?;
    let seconds = tx
        .time_stamp
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid timestamp '{}': {}", tx.time_stamp, e))?;
    let timestamp = Utc
        .timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| format!("timestamp {} out of range", seconds))?;

    Ok(DecodedTransaction {
        hash: tx.hash.clone(),
        from: tx.from.clone(),
        value,
        block_number,
        timestamp,
        decoded_raw_input,
    })
}

/// Decode `0x`-prefixed hex calldata as UTF-8 text
pub fn decode_input_message(input: &str) -> Result<String, String> {
    let hex_data = input.trim();
    let hex_data = hex_data
        .strip_prefix("0x")
        .or_else(|| hex_data.strip_prefix("0X"))
        .unwrap_or(hex_data);

    if hex_data.is_empty() {
        return Err("no input data".to_string());
    }

    let bytes = hex::decode(hex_data).map_err(|e| format!("input is not hex: {}", e))?;
    let text = String::from_utf8(bytes).map_err(|e| format!("input is not UTF-8: {}", e))?;
    let text = text.trim_end_matches('\0');

    if text.is_empty() {
        return Err("input decodes to empty text".to_string());
    }

    Ok(text.to_string())
}
