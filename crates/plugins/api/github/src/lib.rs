//! GitHub provider implementation for git-request-list.
//!
//! Lists the repositories visible to a token (or a named user), then
//! collects the open pull requests of every repository accepted by the
//! configured filter.

mod client;
mod types;

pub use client::GitHubClient;
pub use types::*;

/// Default GitHub API URL.
pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";
