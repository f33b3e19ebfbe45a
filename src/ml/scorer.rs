use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};

use crate::config::RiskConfig;
use crate::models::{BatchItemError, BatchResult, FraudPrediction, Transaction};

use super::artifacts::{ArtifactProvider, ArtifactSet};
use super::error::ScoringError;

/// Scores transactions against whatever artifact set the provider currently holds.
#[derive(Clone)]
pub struct FraudScorer {
    artifacts: Arc<dyn ArtifactProvider>,
    risk: RiskConfig,
}

impl FraudScorer {
    pub fn new(artifacts: Arc<dyn ArtifactProvider>, risk: RiskConfig) -> Self {
        Self { artifacts, risk }
    }

    pub fn artifacts(&self) -> &dyn ArtifactProvider {
        self.artifacts.as_ref()
    }

    pub fn risk_config(&self) -> &RiskConfig {
        &self.risk
    }

    pub fn score(&self, txn: &Transaction) -> Result<FraudPrediction, ScoringError> {
        let set = self.artifacts.current().ok_or(ScoringError::ModelsUnavailable)?;
        score_transaction(&set, &self.risk, txn)
    }

    /// Score every item against one artifact snapshot. Per-item failures are
    /// reported in the result; only an unloaded model or an empty input fails
    /// the whole call.
    pub fn score_batch(&self, items: &[Transaction]) -> Result<BatchResult, ScoringError> {
        let set = self.artifacts.current().ok_or(ScoringError::ModelsUnavailable)?;
        if items.is_empty() {
            return Err(ScoringError::EmptyBatch);
        }

        counter!("batch_requests_total").increment(1);

        let mut results = Vec::with_capacity(items.len());
        let mut errors = Vec::new();

        for (index, txn) in items.iter().enumerate() {
            match score_transaction(&set, &self.risk, txn) {
                Ok(prediction) => results.push(prediction),
                Err(e) => {
                    tracing::warn!(
                        index,
                        transaction_id = txn.transaction_id,
                        error = %e,
                        "Batch item failed"
                    );
                    errors.push(BatchItemError {
                        index,
                        transaction_id: txn.transaction_id,
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            total = items.len(),
            succeeded = results.len(),
            failed = errors.len(),
            "Batch scored"
        );

        Ok(BatchResult {
            total: items.len(),
            succeeded: results.len(),
            failed: errors.len(),
            results,
            errors,
        })
    }
}

fn score_transaction(
    set: &ArtifactSet,
    risk: &RiskConfig,
    txn: &Transaction,
) -> Result<FraudPrediction, ScoringError> {
    let started = Instant::now();
    let result = run_pipeline(set, risk, txn);
    histogram!("prediction_latency_seconds").record(started.elapsed().as_secs_f64());

    if result.is_err() {
        counter!("prediction_failures_total").increment(1);
    }
    result
}

fn run_pipeline(
    set: &ArtifactSet,
    risk: &RiskConfig,
    txn: &Transaction,
) -> Result<FraudPrediction, ScoringError> {
    let fields = txn.feature_map();

    let mut ordered = Vec::with_capacity(set.columns().len());
    let mut missing = Vec::new();
    for column in set.columns() {
        match fields.get(column.as_str()) {
            Some(value) => ordered.push(*value),
            None => missing.push(column.clone()),
        }
    }
    if !missing.is_empty() {
        return Err(ScoringError::SchemaMismatch { missing });
    }

    let scaled = set.scaler().transform(&ordered)?;
    let prediction = set.classifier().predict(&scaled)?;
    let probability = set.classifier().predict_proba(&scaled)?;

    if !(0.0..=1.0).contains(&probability) {
        return Err(ScoringError::Fault(format!(
            "classifier returned probability {probability} outside [0, 1]"
        )));
    }

    let tier = risk.tier(probability);
    counter!("predictions_total", "risk_level" => tier.as_str()).increment(1);

    tracing::debug!(
        transaction_id = txn.transaction_id,
        probability,
        %tier,
        "Transaction scored"
    );

    Ok(FraudPrediction {
        transaction_id: txn.transaction_id,
        customer_id: txn.customer_id,
        fraud_prediction: prediction,
        fraud_probability: round4(probability),
        risk_level: risk.label(tier).to_string(),
    })
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
