use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Single failure kind for catalogue fetches. Connection errors, unexpected
/// statuses, and undecodable bodies all collapse into this; the reason is for
/// logs, not for end users.
#[derive(Debug, Clone, Error)]
#[error("recipe fetch failed: {reason}")]
pub struct FetchError {
    reason: String,
}

impl FetchError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}
