use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

pub const DEFAULT_PAGE_LIMIT: i64 = 100;
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// A stored worker. JSON keys are upper-case (`WORKER_ID`, `FIRST_NAME`, ...);
/// table columns stay lower-case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "snake_case")]
pub struct Worker {
    pub worker_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub salary: i32,
    pub joining_date: NaiveDateTime,
    pub department: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CreateWorker {
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,
    #[validate(length(min = 1, max = 255))]
    pub last_name: String,
    #[validate(range(min = 1, message = "salary must be positive"))]
    pub salary: i32,
    #[serde(deserialize_with = "deserialize_joining_date")]
    pub joining_date: NaiveDateTime,
    #[validate(length(min = 1, max = 255))]
    pub department: String,
}

/// Partial update: `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct UpdateWorker {
    #[validate(length(min = 1, max = 255))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub last_name: Option<String>,
    #[validate(range(min = 1, message = "salary must be positive"))]
    pub salary: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_joining_date")]
    pub joining_date: Option<NaiveDateTime>,
    #[validate(length(min = 1, max = 255))]
    pub department: Option<String>,
}

impl UpdateWorker {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.salary.is_none()
            && self.joining_date.is_none()
            && self.department.is_none()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListWorkersQuery {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000))]
    pub limit: i64,
    pub department: Option<String>,
}

impl Default for ListWorkersQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
            department: None,
        }
    }
}

impl ListWorkersQuery {
    /// An empty department string means "no filter".
    pub fn department_filter(&self) -> Option<&str> {
        self.department.as_deref().filter(|d| !d.is_empty())
    }
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

/// Accepts RFC 3339 timestamps (`Z` or `±HH:MM`, normalised to UTC), naive
/// ISO 8601 date-times, and bare dates (midnight).
pub fn parse_joining_date(raw: &str) -> Result<NaiveDateTime, String> {
    let raw = raw.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.naive_utc());
    }
    if let Ok(naive) = raw.parse::<NaiveDateTime>() {
        return Ok(naive);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(naive);
    }
    raw.parse::<NaiveDate>()
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("invalid JOINING_DATE '{raw}': expected an ISO 8601 date-time"))
}

fn deserialize_joining_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_joining_date(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_optional_joining_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_joining_date(&raw))
        .transpose()
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryStats {
    pub average: f64,
    pub minimum: i32,
    pub maximum: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerStats {
    pub total_workers: i64,
    pub salary_stats: SalaryStats,
    pub departments: BTreeMap<String, i64>,
}
