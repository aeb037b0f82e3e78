//! Common types used across providers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pull request (GitHub) or merge request (GitLab), normalized.
///
/// Every field comes from a single upstream record. Requests from different
/// sources are never merged, even when they point at the same repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Full repository name, e.g. `org/repo`
    pub repository: String,
    /// Request title
    pub name: String,
    /// Upstream state (`open`, `opened`, ...) when the source reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Web URL of the request
    pub url: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}
