//! Repository name filtering.
//!
//! A source's `repositories` list is compiled into a single regex that
//! accepts a repository when any entry matches anywhere in its full name.
//! Entries are not anchored: `org/` accepts `org/api` and `my-org/api`
//! alike, so write `^org/` for a prefix or `^org/api$` for an exact name.

use regex::Regex;

use crate::{Error, Result};

/// Filter applied to full repository names before their requests are fetched.
#[derive(Debug, Clone, Default)]
pub struct RepositoryFilter {
    pattern: Option<Regex>,
}

impl RepositoryFilter {
    /// A filter that accepts every repository.
    pub fn all() -> Self {
        Self::default()
    }

    /// Compile a filter from a list of patterns. An empty list accepts all.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(Self::all());
        }

        let alternation = patterns
            .iter()
            .map(|p| format!("(?:{})", p.as_ref()))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = Regex::new(&alternation).map_err(|e| {
            Error::Config(format!("Invalid repository filter: {}", e))
        })?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Whether the filter accepts everything.
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    /// Check a full repository name against the filter.
    pub fn matches(&self, repository: &str) -> bool {
        match &self.pattern {
            Some(re) => re.is_match(repository),
            None => true,
        }
    }
}
