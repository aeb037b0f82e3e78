//! GitLab API client implementation.

use async_trait::async_trait;
use gitreq_core::{Error, Provider, RepositoryFilter, Request, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::{GitLabMergeRequest, GitLabProject};
use crate::DEFAULT_GITLAB_URL;

/// Header carrying the page count of a list endpoint.
const TOTAL_PAGES: &str = "x-total-pages";

/// GitLab API client.
pub struct GitLabClient {
    base_url: String,
    token: String,
    skip_wip: bool,
    client: reqwest::Client,
}

impl GitLabClient {
    /// Create a new GitLab client.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_GITLAB_URL, token)
    }

    /// Create a new GitLab client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("git-request-list/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            skip_wip: false,
            client,
        })
    }

    /// Drop merge requests flagged as work in progress.
    pub fn with_skip_wip(mut self, skip_wip: bool) -> Self {
        self.skip_wip = skip_wip;
        self
    }

    /// Get the API URL for a given endpoint.
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api/v4{}", self.base_url, endpoint)
    }

    /// Send an authenticated request and reject non-success statuses.
    async fn send(&self, method: Method, url: &str) -> Result<reqwest::Response> {
        debug!(method = %method, url = url, "GitLab request");

        let response = self
            .client
            .request(method, url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!(
                status = status_code,
                message = message,
                "GitLab API error response"
            );
            return Err(Error::from_status(status_code, message));
        }

        Ok(response)
    }

    /// Read the page count of a list endpoint with a HEAD request.
    async fn total_pages(&self, url: &str) -> Result<u32> {
        let response = self.send(Method::HEAD, url).await?;

        response
            .headers()
            .get(TOTAL_PAGES)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok())
            .ok_or_else(|| {
                Error::InvalidData(format!("Missing or invalid X-Total-Pages header for {}", url))
            })
    }

    /// Fetch all pages of a list endpoint. `url` must already carry a query.
    async fn get_pages<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let pages = self.total_pages(url).await?;
        debug!(url = url, pages = pages, "GitLab listing");

        let mut items = Vec::new();
        for page in 1..=pages {
            let response = self.send(Method::GET, &format!("{}&page={}", url, page)).await?;
            let batch: Vec<T> = response
                .json()
                .await
                .map_err(|e| Error::InvalidData(format!("Failed to parse response: {}", e)))?;
            items.extend(batch);
        }

        Ok(items)
    }

    /// Projects with merge requests enabled whose path is accepted by `filter`.
    async fn list_projects(&self, filter: &RepositoryFilter) -> Result<Vec<GitLabProject>> {
        let url = self.api_url("/projects?simple=1&with_merge_requests_enabled=1&per_page=100");
        let projects: Vec<GitLabProject> = self.get_pages(&url).await?;

        Ok(projects
            .into_iter()
            .filter(|p| filter.matches(&p.path_with_namespace))
            .collect())
    }

    /// Open merge requests of one project, honouring `skip_wip`.
    async fn list_merge_requests(&self, project: &GitLabProject) -> Result<Vec<Request>> {
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests?state=opened&per_page=100",
            project.id
        ));
        let merge_requests: Vec<GitLabMergeRequest> = self.get_pages(&url).await?;

        Ok(merge_requests
            .iter()
            .filter(|mr| !(self.skip_wip && mr.is_wip()))
            .map(|mr| map_merge_request(&project.path_with_namespace, mr))
            .collect())
    }
}

// =============================================================================
// Mapping functions: GitLab types -> Unified types
// =============================================================================

fn map_merge_request(repository: &str, mr: &GitLabMergeRequest) -> Request {
    Request {
        repository: repository.to_string(),
        name: mr.title.clone(),
        state: Some(mr.state.clone()),
        url: mr.web_url.clone(),
        created: mr.created_at,
        updated: mr.updated_at,
    }
}

// =============================================================================
// Trait implementations
// =============================================================================

#[async_trait]
impl Provider for GitLabClient {
    fn provider_name(&self) -> &'static str {
        "gitlab"
    }

    async fn get_requests(&self, filter: &RepositoryFilter) -> Result<Vec<Request>> {
        let projects = self.list_projects(filter).await?;
        debug!(count = projects.len(), "GitLab projects accepted");

        let mut requests = Vec::new();
        for project in &projects {
            requests.extend(self.list_merge_requests(project).await?);
        }

        Ok(requests)
    }
}
