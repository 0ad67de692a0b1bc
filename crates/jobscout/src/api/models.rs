// crates/jobscout/src/api/models.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootMessage {
    pub message: String,
}

/// Relay-mode failure payload. Sent with status 200.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Persistent-mode failure payload. Sent with status 500.
#[derive(Debug, Serialize, Deserialize)]
pub struct DetailBody {
    pub detail: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
