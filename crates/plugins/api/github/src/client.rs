//! GitHub API client implementation.

use async_trait::async_trait;
use gitreq_core::{Error, Provider, RepositoryFilter, Request, Result};
use reqwest::header::{HeaderMap, LINK};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::{GitHubPullRequest, GitHubRepository};
use crate::DEFAULT_GITHUB_URL;

/// Header carrying the number of API calls left in the current window.
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// GitHub API client.
pub struct GitHubClient {
    base_url: String,
    token: Option<String>,
    user: Option<String>,
    client: reqwest::Client,
}

impl GitHubClient {
    /// Create a new GitHub client.
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_GITHUB_URL, token)
    }

    /// Create a new GitHub client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("git-request-list/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            user: None,
            client,
        })
    }

    /// List repositories of the named user instead of the authenticated one.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Make a GET request.
    ///
    /// An exhausted rate limit wins over the HTTP status; a missing or
    /// non-numeric quota header is only reported for successful responses.
    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        debug!(method = "GET", url = url, "GitHub request");

        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let remaining = rate_limit_remaining(response.headers());
        if matches!(remaining, Ok(n) if n <= 0) {
            return Err(Error::RateLimited(
                "GitHub API rate limit exceeded".to_string(),
            ));
        }

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!(
                status = status_code,
                message = message,
                "GitHub API error response"
            );
            return Err(Error::from_status(status_code, message));
        }

        remaining?;
        Ok(response)
    }

    /// Fetch every page of a list endpoint by following `rel="next"` links.
    async fn get_all<T: DeserializeOwned>(&self, first_url: String) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(first_url);

        while let Some(url) = next {
            let response = self.get(&url).await?;
            next = next_link(response.headers()).map(|link| self.resolve(&link));

            let page: Vec<T> = response
                .json()
                .await
                .map_err(|e| Error::InvalidData(format!("Failed to parse response: {}", e)))?;
            items.extend(page);
        }

        Ok(items)
    }

    /// Turn a path-only link into an absolute URL.
    fn resolve(&self, link: &str) -> String {
        if link.starts_with('/') {
            format!("{}{}", self.base_url, link)
        } else {
            link.to_string()
        }
    }

    fn repositories_url(&self) -> String {
        match &self.user {
            Some(user) => format!("{}/users/{}/repos?type=all&per_page=100", self.base_url, user),
            None => format!("{}/user/repos?per_page=100", self.base_url),
        }
    }

    /// Full names of the visible repositories accepted by `filter`, in listing order.
    async fn list_repositories(&self, filter: &RepositoryFilter) -> Result<Vec<String>> {
        let repositories: Vec<GitHubRepository> = self.get_all(self.repositories_url()).await?;

        Ok(repositories
            .into_iter()
            .map(|r| r.full_name)
            .filter(|name| filter.matches(name))
            .collect())
    }

    /// Open pull requests of one repository, in page order.
    async fn list_pull_requests(&self, repository: &str) -> Result<Vec<Request>> {
        let url = format!(
            "{}/repos/{}/pulls?state=open&per_page=100",
            self.base_url, repository
        );
        let pulls: Vec<GitHubPullRequest> = self.get_all(url).await?;

        Ok(pulls
            .iter()
            .map(|pr| map_pull_request(repository, pr))
            .collect())
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Read the remaining-quota header. Missing or non-numeric values are invalid.
fn rate_limit_remaining(headers: &HeaderMap) -> Result<i64> {
    let value = headers.get(RATE_LIMIT_REMAINING).ok_or_else(|| {
        Error::InvalidData(format!("Missing {} header", RATE_LIMIT_REMAINING))
    })?;

    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .ok_or_else(|| {
            Error::InvalidData(format!(
                "Unparseable {} header: {:?}",
                RATE_LIMIT_REMAINING, value
            ))
        })
}

/// Extract the `rel="next"` target from a `Link` header.
fn next_link(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(LINK)?.to_str().ok()?;
    parse_next_link(raw)
}

fn parse_next_link(raw: &str) -> Option<String> {
    raw.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|p| p.trim() == r#"rel="next""#);
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

fn map_pull_request(repository: &str, pr: &GitHubPullRequest) -> Request {
    Request {
        repository: repository.to_string(),
        name: pr.title.clone(),
        state: Some(pr.state.clone()),
        url: pr.html_url.clone(),
        created: pr.created_at,
        updated: pr.updated_at,
    }
}

// =============================================================================
// Trait implementations
// =============================================================================

#[async_trait]
impl Provider for GitHubClient {
    fn provider_name(&self) -> &'static str {
        "github"
    }

    async fn get_requests(&self, filter: &RepositoryFilter) -> Result<Vec<Request>> {
        let repositories = self.list_repositories(filter).await?;
        debug!(count = repositories.len(), "GitHub repositories accepted");

        let mut requests = Vec::new();
        for repository in &repositories {
            requests.extend(self.list_pull_requests(repository).await?);
        }

        Ok(requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use reqwest::header::HeaderValue;

    #[test]
    fn test_parse_next_link() {
        let raw = r#"<https://api.github.com/user/repos?page=2>; rel="next", <https://api.github.com/user/repos?page=5>; rel="last""#;
        assert_eq!(
            parse_next_link(raw),
            Some("https://api.github.com/user/repos?page=2".to_string())
        );
    }

    #[test]
    fn test_parse_next_link_not_first() {
        let raw = r#"<https://api.github.com/user/repos?page=1>; rel="prev", <https://api.github.com/user/repos?page=3>; rel="next""#;
        assert_eq!(
            parse_next_link(raw),
            Some("https://api.github.com/user/repos?page=3".to_string())
        );
    }

    #[test]
    fn test_parse_next_link_last_page() {
        let raw = r#"<https://api.github.com/user/repos?page=1>; rel="first", <https://api.github.com/user/repos?page=4>; rel="prev""#;
        assert_eq!(parse_next_link(raw), None);
        assert_eq!(parse_next_link(""), None);
    }

    #[test]
    fn test_rate_limit_remaining() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            rate_limit_remaining(&headers),
            Err(Error::InvalidData(_))
        ));

        headers.insert(RATE_LIMIT_REMAINING, HeaderValue::from_static("12"));
        assert_eq!(rate_limit_remaining(&headers).unwrap(), 12);

        headers.insert(RATE_LIMIT_REMAINING, HeaderValue::from_static(" 0 "));
        assert_eq!(rate_limit_remaining(&headers).unwrap(), 0);

        headers.insert(RATE_LIMIT_REMAINING, HeaderValue::from_static("-1"));
        assert_eq!(rate_limit_remaining(&headers).unwrap(), -1);

        headers.insert(RATE_LIMIT_REMAINING, HeaderValue::from_static("lots"));
        assert!(matches!(
            rate_limit_remaining(&headers),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_map_pull_request() {
        let pr = GitHubPullRequest {
            title: "Add feature".to_string(),
            state: "open".to_string(),
            html_url: "https://github.com/org/api/pull/7".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap(),
        };

        let request = map_pull_request("org/api", &pr);
        assert_eq!(request.repository, "org/api");
        assert_eq!(request.name, "Add feature");
        assert_eq!(request.state.as_deref(), Some("open"));
        assert_eq!(request.url, "https://github.com/org/api/pull/7");
        assert_eq!(request.created, pr.created_at);
        assert_eq!(request.updated, pr.updated_at);
    }

    // =========================================================================
    // Integration tests with httpmock
    // =========================================================================

    mod integration {
        use super::*;
        use httpmock::prelude::*;

        fn create_test_client(server: &MockServer) -> GitHubClient {
            GitHubClient::with_base_url(server.base_url(), Some("test-token".to_string())).unwrap()
        }

        fn pull(title: &str, number: u32, created: &str) -> serde_json::Value {
            serde_json::json!({
                "id": number,
                "number": number,
                "title": title,
                "state": "open",
                "url": format!("https://api.github.com/repos/x/pulls/{}", number),
                "html_url": format!("https://github.com/x/pull/{}", number),
                "created_at": created,
                "updated_at": created
            })
        }

        #[tokio::test]
        async fn test_get_requests_follows_pagination() {
            let server = MockServer::start();

            let repos_page_1 = server.mock(|when, then| {
                when.method(GET)
                    .path("/user/repos")
                    .query_param("per_page", "100")
                    .header("Authorization", "token test-token");
                then.status(200)
                    .header("X-RateLimit-Remaining", "4999")
                    .header(
                        "Link",
                        format!(r#"<{}>; rel="next""#, server.url("/user/repos?page=2")),
                    )
                    .json_body(serde_json::json!([
                        {"id": 1, "full_name": "org/api"},
                        {"id": 2, "full_name": "org/web"}
                    ]));
            });
            let repos_page_2 = server.mock(|when, then| {
                when.method(GET).path("/user/repos").query_param("page", "2");
                then.status(200)
                    .header("X-RateLimit-Remaining", "4998")
                    .json_body(serde_json::json!([{"id": 3, "full_name": "org/docs"}]));
            });

            let api_page_1 = server.mock(|when, then| {
                when.method(GET)
                    .path("/repos/org/api/pulls")
                    .query_param("state", "open")
                    .query_param("per_page", "100");
                then.status(200)
                    .header("X-RateLimit-Remaining", "5000")
                    .header(
                        "Link",
                        format!(
                            r#"<{}>; rel="next""#,
                            server.url("/repos/org/api/pulls?page=2")
                        ),
                    )
                    .json_body(serde_json::json!([pull("api one", 1, "2024-01-03T00:00:00Z")]));
            });
            let api_page_2 = server.mock(|when, then| {
                when.method(GET)
                    .path("/repos/org/api/pulls")
                    .query_param("page", "2");
                then.status(200)
                    .header("X-RateLimit-Remaining", "5000")
                    .json_body(serde_json::json!([pull("api two", 2, "2024-01-01T00:00:00Z")]));
            });
            let web = server.mock(|when, then| {
                when.method(GET).path("/repos/org/web/pulls");
                then.status(200)
                    .header("X-RateLimit-Remaining", "5000")
                    .json_body(serde_json::json!([]));
            });
            let docs = server.mock(|when, then| {
                when.method(GET).path("/repos/org/docs/pulls");
                then.status(200)
                    .header("X-RateLimit-Remaining", "5000")
                    .json_body(serde_json::json!([pull("docs one", 9, "2024-01-02T00:00:00Z")]));
            });

            let client = create_test_client(&server);
            let requests = client.get_requests(&RepositoryFilter::all()).await.unwrap();

            repos_page_1.assert_calls(1);
            repos_page_2.assert_calls(1);
            api_page_1.assert_calls(1);
            api_page_2.assert_calls(1);
            web.assert_calls(1);
            docs.assert_calls(1);

            let summary: Vec<(&str, &str)> = requests
                .iter()
                .map(|r| (r.repository.as_str(), r.name.as_str()))
                .collect();
            assert_eq!(
                summary,
                vec![
                    ("org/api", "api one"),
                    ("org/api", "api two"),
                    ("org/docs", "docs one"),
                ]
            );
            assert_eq!(requests[2].url, "https://github.com/x/pull/9");
            assert_eq!(requests[0].state.as_deref(), Some("open"));
        }

        #[tokio::test]
        async fn test_filter_skips_repositories() {
            let server = MockServer::start();

            server.mock(|when, then| {
                when.method(GET).path("/user/repos");
                then.status(200)
                    .header("X-RateLimit-Remaining", "5000")
                    .json_body(serde_json::json!([
                    {"full_name": "org/api"},
                    {"full_name": "org/web"}
                ]));
            });
            let api = server.mock(|when, then| {
                when.method(GET).path("/repos/org/api/pulls");
                then.status(200)
                    .header("X-RateLimit-Remaining", "5000")
                    .json_body(serde_json::json!([pull("api one", 1, "2024-01-03T00:00:00Z")]));
            });
            let web = server.mock(|when, then| {
                when.method(GET).path("/repos/org/web/pulls");
                then.status(200)
                    .header("X-RateLimit-Remaining", "5000")
                    .json_body(serde_json::json!([]));
            });

            let client = create_test_client(&server);
            let filter = RepositoryFilter::new(&["org/api"]).unwrap();
            let requests = client.get_requests(&filter).await.unwrap();

            api.assert_calls(1);
            web.assert_calls(0);
            assert_eq!(requests.len(), 1);
            assert!(requests.iter().all(|r| filter.matches(&r.repository)));
        }

        #[tokio::test]
        async fn test_rate_limit_aborts_without_further_requests() {
            let server = MockServer::start();

            let first = server.mock(|when, then| {
                when.method(GET)
                    .path("/user/repos")
                    .query_param("per_page", "100");
                then.status(200)
                    .header("X-RateLimit-Remaining", "0")
                    .header(
                        "Link",
                        format!(r#"<{}>; rel="next""#, server.url("/user/repos?page=2")),
                    )
                    .json_body(serde_json::json!([{"full_name": "org/api"}]));
            });
            let second = server.mock(|when, then| {
                when.method(GET).path("/user/repos").query_param("page", "2");
                then.status(200)
                    .header("X-RateLimit-Remaining", "5000")
                    .json_body(serde_json::json!([]));
            });
            let pulls = server.mock(|when, then| {
                when.method(GET).path("/repos/org/api/pulls");
                then.status(200)
                    .header("X-RateLimit-Remaining", "5000")
                    .json_body(serde_json::json!([]));
            });

            let client = create_test_client(&server);
            let err = client
                .get_requests(&RepositoryFilter::all())
                .await
                .unwrap_err();

            assert!(matches!(err, Error::RateLimited(_)));
            assert!(err.is_api());
            first.assert_calls(1);
            second.assert_calls(0);
            pulls.assert_calls(0);
        }

        #[tokio::test]
        async fn test_rate_limit_on_pull_listing_discards_collected_data() {
            let server = MockServer::start();

            server.mock(|when, then| {
                when.method(GET).path("/user/repos");
                then.status(200)
                    .header("X-RateLimit-Remaining", "5000")
                    .json_body(serde_json::json!([
                    {"full_name": "org/api"},
                    {"full_name": "org/web"}
                ]));
            });
            server.mock(|when, then| {
                when.method(GET).path("/repos/org/api/pulls");
                then.status(200)
                    .header("X-RateLimit-Remaining", "1")
                    .json_body(serde_json::json!([pull("api one", 1, "2024-01-03T00:00:00Z")]));
            });
            server.mock(|when, then| {
                when.method(GET).path("/repos/org/web/pulls");
                then.status(403)
                    .header("X-RateLimit-Remaining", "0")
                    .body(r#"{"message":"API rate limit exceeded"}"#);
            });

            let client = create_test_client(&server);
            let result = client.get_requests(&RepositoryFilter::all()).await;
            assert!(matches!(result, Err(Error::RateLimited(_))));
        }

        #[tokio::test]
        async fn test_named_user_without_token() {
            let server = MockServer::start();

            let repos = server.mock(|when, then| {
                when.method(GET)
                    .path("/users/octocat/repos")
                    .query_param("type", "all");
                then.status(200)
                    .header("X-RateLimit-Remaining", "5000")
                    .json_body(serde_json::json!([{"full_name": "octocat/hello"}]));
            });
            server.mock(|when, then| {
                when.method(GET).path("/repos/octocat/hello/pulls");
                then.status(200)
                    .header("X-RateLimit-Remaining", "5000")
                    .json_body(serde_json::json!([pull("hi", 3, "2024-01-03T00:00:00Z")]));
            });

            let client = GitHubClient::with_base_url(server.base_url(), None)
                .unwrap()
                .with_user("octocat");
            let requests = client.get_requests(&RepositoryFilter::all()).await.unwrap();

            repos.assert_calls(1);
            assert_eq!(requests.len(), 1);
            assert_eq!(requests[0].repository, "octocat/hello");
        }

        #[tokio::test]
        async fn test_unparseable_rate_limit_header() {
            let server = MockServer::start();

            server.mock(|when, then| {
                when.method(GET).path("/user/repos");
                then.status(200)
                    .header("X-RateLimit-Remaining", "unknown")
                    .json_body(serde_json::json!([]));
            });

            let client = create_test_client(&server);
            let err = client
                .get_requests(&RepositoryFilter::all())
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidData(_)));
        }

        #[tokio::test]
        async fn test_missing_rate_limit_header() {
            let server = MockServer::start();

            server.mock(|when, then| {
                when.method(GET).path("/user/repos");
                then.status(200)
                    .json_body(serde_json::json!([{"full_name": "org/api"}]));
            });
            let pulls = server.mock(|when, then| {
                when.method(GET).path("/repos/org/api/pulls");
                then.status(200)
                    .header("X-RateLimit-Remaining", "5000")
                    .json_body(serde_json::json!([]));
            });

            let client = create_test_client(&server);
            let err = client
                .get_requests(&RepositoryFilter::all())
                .await
                .unwrap_err();

            assert!(matches!(err, Error::InvalidData(_)));
            pulls.assert_calls(0);
        }

        #[tokio::test]
        async fn test_api_error_handling() {
            let server = MockServer::start();

            server.mock(|when, then| {
                when.method(GET).path("/user/repos");
                then.status(401).body(r#"{"message":"Bad credentials"}"#);
            });

            let client = create_test_client(&server);
            let err = client
                .get_requests(&RepositoryFilter::all())
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Api { status: 401, .. }));
        }

        #[tokio::test]
        async fn test_invalid_json() {
            let server = MockServer::start();

            server.mock(|when, then| {
                when.method(GET).path("/user/repos");
                then.status(200)
                    .header("X-RateLimit-Remaining", "5000")
                    .body("not json");
            });

            let client = create_test_client(&server);
            let err = client
                .get_requests(&RepositoryFilter::all())
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidData(_)));
        }
    }
}
