use std::env;
use std::path::PathBuf;

use serde::Serialize;

const DEFAULT_APP_NAME: &str = "Fraud Scoring API";
const DEFAULT_MODEL_PATH: &str = "./models";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub version: String,
    pub environment: String,
    pub debug: bool,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,

    // Database
    pub database_url: String,
    pub db_max_connections: u32,
    pub auto_migrate: bool,

    // Fraud model
    pub ml_model_path: PathBuf,
    pub risk: RiskConfig,
}

/// Probability bands used to turn a fraud probability into a risk label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskConfig {
    pub low_threshold: f64,
    pub high_threshold: f64,
    pub normal_label: String,
    pub moderate_label: String,
    pub high_label: String,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            low_threshold: 0.3,
            high_threshold: 0.7,
            normal_label: "Normal / No Risk".into(),
            moderate_label: "Moderate Risk (Verify)".into(),
            high_label: "High Risk (Avoid)".into(),
        }
    }
}

impl RiskConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let config = Self {
            low_threshold: parse_env("FRAUD_RISK_LOW_THRESHOLD", defaults.low_threshold)?,
            high_threshold: parse_env("FRAUD_RISK_HIGH_THRESHOLD", defaults.high_threshold)?,
            normal_label: env::var("FRAUD_RISK_NORMAL_LABEL").unwrap_or(defaults.normal_label),
            moderate_label: env::var("FRAUD_RISK_MODERATE_LABEL")
                .unwrap_or(defaults.moderate_label),
            high_label: env::var("FRAUD_RISK_HIGH_LABEL").unwrap_or(defaults.high_label),
        };
        config.validate()?;

        Ok(config)
    }

    /// Thresholds must be ordered and lie within the probability range.
    pub fn validate(&self) -> anyhow::Result<()> {
        let (low, high) = (self.low_threshold, self.high_threshold);
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) {
            anyhow::bail!("risk thresholds must be within [0, 1] (low={low}, high={high})");
        }
        if low >= high {
            anyhow::bail!("FRAUD_RISK_LOW_THRESHOLD ({low}) must be below FRAUD_RISK_HIGH_THRESHOLD ({high})");
        }
        Ok(())
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let allowed_origins: Vec<String> = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            app_name: env::var("APP_NAME").unwrap_or_else(|_| DEFAULT_APP_NAME.into()),
            version: env::var("VERSION").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").into()),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            debug: parse_bool_env("DEBUG", true)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_env("PORT", 8000)?,
            allowed_origins,

            database_url: database_url_from_env(),
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 10)?,
            auto_migrate: parse_bool_env("AUTO_MIGRATE", false)?,

            ml_model_path: env::var("ML_MODEL_PATH")
                .unwrap_or_else(|_| DEFAULT_MODEL_PATH.into())
                .into(),
            risk: RiskConfig::from_env()?,
        })
    }

    /// Any origin is allowed when the list is empty or contains `*`.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// `DATABASE_URL` wins; otherwise the URL is assembled from the `DB_*` parts.
fn database_url_from_env() -> String {
    if let Ok(url) = env::var("DATABASE_URL") {
        return url;
    }

    let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".into());
    let port = env::var("DB_PORT").unwrap_or_else(|_| "5432".into());
    let name = env::var("DB_NAME").unwrap_or_else(|_| "fraudscope".into());
    let user = env::var("DB_USER").unwrap_or_else(|_| "postgres".into());
    let password = env::var("DB_PASSWORD").unwrap_or_else(|_| "postgres".into());

    format!("postgres://{user}:{password}@{host}:{port}/{name}")
}

fn parse_env<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid value for {key}: {e}")),
        _ => Ok(default),
    }
}

/// Case-insensitive `true/1/yes/on` or `false/0/no/off`.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_bool_env(key: &str, default: bool) -> anyhow::Result<bool> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => parse_bool(&raw)
            .ok_or_else(|| anyhow::anyhow!("invalid boolean for {key}: '{raw}'")),
        _ => Ok(default),
    }
}
