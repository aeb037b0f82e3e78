//! GitLab provider implementation for git-request-list.
//!
//! GitLab reports the number of pages up front (`X-Total-Pages`), so every
//! listing is a HEAD request followed by exactly that many page GETs.

mod client;
mod types;

pub use client::GitLabClient;
pub use types::*;

/// Default GitLab API URL.
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";
