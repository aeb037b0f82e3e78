//! Core traits, types, and error handling for git-request-list.
//!
//! This crate provides the request model shared by every provider, the
//! [`Provider`] abstraction, configuration loading, repository filtering
//! and sorting.

pub mod config;
pub mod error;
pub mod filter;
pub mod provider;
pub mod sort;
pub mod types;

pub use config::{Config, GitHubSourceConfig, GitLabSourceConfig, OutputFormat, SourceConfig};
pub use error::{Error, Result};
pub use filter::RepositoryFilter;
pub use provider::{gather, Provider, Source};
pub use sort::{sort_requests, SortKey};
pub use types::Request;
