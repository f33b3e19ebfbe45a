use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A card transaction submitted for fraud scoring.
///
/// Every field is mandatory. Identifiers are carried as ordinary columns: the
/// loaded column list decides which of them reach the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: i64,
    pub customer_id: i64,
    pub amount: f64,
    pub is_weekend: i64,
    pub night_transaction: i64,
    pub card_not_present: i64,
    pub account_age_days: i64,
    pub new_merchant: i64,
    pub international_txn: i64,
    pub impossible_travel: i64,
    pub txn_velocity_5min: i64,
    pub new_device_high_amount: i64,
    pub blacklisted_ip: i64,
    pub multiple_cards_same_device: i64,
    pub tx_hour: i64,
    pub tx_day: i64,
    pub tx_month: i64,
}

impl Transaction {
    /// Flatten into a column name → numeric value map.
    pub fn feature_map(&self) -> HashMap<&'static str, f64> {
        HashMap::from([
            ("transaction_id", self.transaction_id as f64),
            ("customer_id", self.customer_id as f64),
            ("amount", self.amount),
            ("is_weekend", self.is_weekend as f64),
            ("night_transaction", self.night_transaction as f64),
            ("card_not_present", self.card_not_present as f64),
            ("account_age_days", self.account_age_days as f64),
            ("new_merchant", self.new_merchant as f64),
            ("international_txn", self.international_txn as f64),
            ("impossible_travel", self.impossible_travel as f64),
            ("txn_velocity_5min", self.txn_velocity_5min as f64),
            ("new_device_high_amount", self.new_device_high_amount as f64),
            ("blacklisted_ip", self.blacklisted_ip as f64),
            ("multiple_cards_same_device", self.multiple_cards_same_device as f64),
            ("tx_hour", self.tx_hour as f64),
            ("tx_day", self.tx_day as f64),
            ("tx_month", self.tx_month as f64),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudPrediction {
    pub transaction_id: i64,
    pub customer_id: i64,
    pub fraud_prediction: u8,
    pub fraud_probability: f64,
    pub risk_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchTransactionRequest {
    pub transactions: Vec<Transaction>,
}

/// A single failed item inside a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItemError {
    #[serde(rename = "transaction_index")]
    pub index: usize,
    pub transaction_id: i64,
    #[serde(rename = "error")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    #[serde(rename = "total_transactions")]
    pub total: usize,
    #[serde(rename = "successful_predictions")]
    pub succeeded: usize,
    #[serde(rename = "failed_predictions")]
    pub failed: usize,
    pub results: Vec<FraudPrediction>,
    pub errors: Vec<BatchItemError>,
}
