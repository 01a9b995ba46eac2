use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::models::DecodedTransaction;

/// A donation about to be written; the Namada key is derived at write time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDonation {
    pub transaction_hash: String,
    pub from_address: String,
    pub amount: Decimal,
    pub input_message: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&DecodedTransaction> for NewDonation {
    fn from(tx: &DecodedTransaction) -> Self {
        Self {
            transaction_hash: tx.hash.clone(),
            from_address: tx.from.clone(),
            amount: tx.value,
            input_message: tx.decoded_raw_input.clone(),
            timestamp: tx.timestamp,
        }
    }
}

/// A stored donation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    /// Transaction hash, unique
    pub transaction_hash: String,

    /// Sender address
    pub from_address: String,

    /// Transferred value in the chain's base unit
    pub amount: Decimal,

    /// Namada address found in the memo, empty if none validated
    pub namada_key: String,

    /// Memo exactly as decoded from the transaction input
    pub input_message: String,

    /// Block timestamp of the transaction
    pub timestamp: DateTime<Utc>,
}
