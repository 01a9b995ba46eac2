use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A transaction as returned by the chain-data API, before decoding.
///
/// Numeric fields are kept as the API's decimal strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTransaction {
    pub hash: String,

    #[serde(rename = "blockNumber")]
    pub block_number: String,

    #[serde(rename = "timeStamp")]
    pub time_stamp: String,

    pub from: String,

    #[serde(default)]
    pub to: String,

    /// Value in wei
    pub value: String,

    /// `0x`-prefixed calldata
    #[serde(default)]
    pub input: String,

    /// "1" when execution failed
    #[serde(rename = "isError", default)]
    pub is_error: String,

    /// "0" when the receipt reports failure, empty for pre-Byzantium blocks
    #[serde(default)]
    pub txreceipt_status: String,
}

impl RawTransaction {
    /// Returns true if the chain reports this transaction as failed
    pub fn is_failed(&self) -> bool {
        self.is_error == "1" || self.txreceipt_status == "0"
    }
}

/// A transaction whose input data decoded to a text memo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedTransaction {
    pub hash: String,
    pub from: String,
    pub value: Decimal,
    pub block_number: u64,
    pub timestamp: DateTime<Utc>,
    /// Input data decoded as UTF-8 text
    pub decoded_raw_input: String,
}
