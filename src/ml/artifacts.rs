use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use metrics::{counter, gauge};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::ArtifactError;
use super::estimators::{Classifier, ClassifierArtifact, FeatureScaler, StandardScaler, StandardScalerFile};

pub const MODEL_FILE: &str = "fraud_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const COLUMNS_FILE: &str = "model_columns.json";

/// A complete, mutually consistent classifier + scaler + column order.
pub struct ArtifactSet {
    classifier: Box<dyn Classifier>,
    scaler: Box<dyn FeatureScaler>,
    columns: Vec<String>,
}

impl ArtifactSet {
    pub fn new(
        classifier: Box<dyn Classifier>,
        scaler: Box<dyn FeatureScaler>,
        columns: Vec<String>,
    ) -> Result<Self, ArtifactError> {
        if columns.is_empty() {
            return Err(ArtifactError::Inconsistent("column list is empty".into()));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(ArtifactError::Inconsistent(format!(
                "column '{dup}' is listed more than once"
            )));
        }

        if scaler.n_features() != columns.len() || classifier.n_features() != columns.len() {
            return Err(ArtifactError::Inconsistent(format!(
                "{} columns, scaler width {}, classifier width {}",
                columns.len(),
                scaler.n_features(),
                classifier.n_features()
            )));
        }

        Ok(Self {
            classifier,
            scaler,
            columns,
        })
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn scaler(&self) -> &dyn FeatureScaler {
        self.scaler.as_ref()
    }

    /// Required feature columns, in the order the scaler and classifier were fitted on.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Read all three artifacts from `dir`. Nothing is returned unless every file
/// exists, parses, and agrees with the others.
pub fn load_from_dir(dir: &Path) -> Result<ArtifactSet, ArtifactError> {
    let model_path = dir.join(MODEL_FILE);
    let scaler_path = dir.join(SCALER_FILE);
    let columns_path = dir.join(COLUMNS_FILE);

    for path in [&model_path, &scaler_path, &columns_path] {
        if !path.is_file() {
            return Err(ArtifactError::Missing(path.clone()));
        }
    }

    let classifier = read_json::<ClassifierArtifact>(&model_path)?.into_classifier()?;
    let scaler = StandardScaler::try_from(read_json::<StandardScalerFile>(&scaler_path)?)?;
    let columns: Vec<String> = read_json(&columns_path)?;

    ArtifactSet::new(classifier, Box::new(scaler), columns)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&raw).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadResult {
    pub loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Source of the currently active artifact set.
///
/// `current` hands out an immutable snapshot; callers score against that
/// snapshot even if a reload publishes a new set midway.
pub trait ArtifactProvider: Send + Sync {
    fn current(&self) -> Option<Arc<ArtifactSet>>;

    fn reload(&self) -> LoadResult;

    fn is_loaded(&self) -> bool {
        self.current().is_some()
    }
}

/// Artifacts loaded from a directory on disk, replaced wholesale on reload.
pub struct ArtifactStore {
    dir: PathBuf,
    active: RwLock<Option<Arc<ArtifactSet>>>,
}

impl ArtifactStore {
    /// An empty store; nothing is read until `reload`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            active: RwLock::new(None),
        }
    }

    /// Create the store and make a best-effort initial load.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let store = Self::new(dir);
        store.reload();
        store
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Swap in a fully built set.
    pub fn publish(&self, set: ArtifactSet) {
        let set = Arc::new(set);
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Some(set);
        gauge!("models_loaded").set(1.0);
    }
}

impl ArtifactProvider for ArtifactStore {
    fn current(&self) -> Option<Arc<ArtifactSet>> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn reload(&self) -> LoadResult {
        match load_from_dir(&self.dir) {
            Ok(set) => {
                let columns = set.columns().len();
                self.publish(set);
                counter!("model_reloads_total", "outcome" => "success").increment(1);
                tracing::info!(
                    dir = %self.dir.display(),
                    columns,
                    "Fraud detection models loaded"
                );
                LoadResult {
                    loaded: true,
                    error: None,
                }
            }
            Err(e) => {
                counter!("model_reloads_total", "outcome" => "failure").increment(1);
                tracing::warn!(
                    dir = %self.dir.display(),
                    error = %e,
                    keeping_previous = self.is_loaded(),
                    "Fraud detection models could not be loaded"
                );
                LoadResult {
                    loaded: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
