//! GitLab API response types.
//!
//! These types represent the raw JSON responses from GitLab REST API v4.
//! They are deserialized and then mapped to unified types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitLab project, as returned by `GET /projects?simple=1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabProject {
    pub id: u64,
    /// `group/subgroup/project`
    pub path_with_namespace: String,
}

/// GitLab merge request representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabMergeRequest {
    pub title: String,
    pub state: String,
    pub web_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Legacy flag, replaced by `draft` in newer GitLab versions
    #[serde(default)]
    pub work_in_progress: bool,
    #[serde(default)]
    pub draft: bool,
}

impl GitLabMergeRequest {
    /// Whether the merge request is flagged as work in progress.
    pub fn is_wip(&self) -> bool {
        self.work_in_progress || self.draft
    }
}
