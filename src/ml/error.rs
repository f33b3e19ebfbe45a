use std::path::PathBuf;

/// Failures of a scoring call, single or batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("Fraud detection models not loaded. Please check the model files in the configured model directory.")]
    ModelsUnavailable,

    #[error("Missing required columns: {missing:?}")]
    SchemaMismatch { missing: Vec<String> },

    #[error("No transactions provided for batch processing.")]
    EmptyBatch,

    #[error("{0}")]
    Fault(String),
}

/// Failures while reading the model artifacts from disk.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("inconsistent artifacts: {0}")]
    Inconsistent(String),
}
