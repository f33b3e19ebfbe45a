pub mod artifacts;
pub mod error;
pub mod estimators;
pub mod risk;
pub mod scorer;

pub use artifacts::{ArtifactProvider, ArtifactSet, ArtifactStore, LoadResult, COLUMNS_FILE, MODEL_FILE, SCALER_FILE};
pub use error::{ArtifactError, ScoringError};
pub use estimators::{Classifier, FeatureScaler, LogisticRegression, StandardScaler};
pub use risk::RiskTier;
pub use scorer::FraudScorer;
