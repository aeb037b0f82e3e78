//! GitHub API response types.
//!
//! These types represent the raw JSON responses from GitHub API.
//! They are deserialized and then mapped to unified types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub repository, as returned by the repository listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepository {
    /// `owner/name`
    pub full_name: String,
}

/// GitHub pull request representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubPullRequest {
    pub title: String,
    pub state: String,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
