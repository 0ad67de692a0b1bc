use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "Unknown";

/// A job posting in the relay's fixed schema. This is both what the
/// normalizer emits and what a `jobs` row reads back as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub url: String,
    pub description: Option<String>,
}

/// A stored row with its bookkeeping column, for operator listings.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StoredJob {
    pub id: String,
    pub title: String,
    pub company: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}
