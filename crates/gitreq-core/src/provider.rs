//! Provider trait for git hosting services.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::Result;
use crate::filter::RepositoryFilter;
use crate::types::Request;

/// Trait for git hosting providers (GitHub, GitLab).
///
/// A provider lists the repositories visible to its credentials, keeps the
/// ones accepted by the filter, and returns their open requests in listing
/// order. Any failure aborts the whole fetch; no partial result is returned.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider name (e.g., "gitlab", "github")
    fn provider_name(&self) -> &'static str;

    /// Get open pull/merge requests from repositories matching `filter`
    async fn get_requests(&self, filter: &RepositoryFilter) -> Result<Vec<Request>>;
}

/// A configured provider paired with its repository filter.
pub struct Source {
    pub provider: Box<dyn Provider>,
    pub filter: RepositoryFilter,
}

impl Source {
    pub fn new(provider: Box<dyn Provider>, filter: RepositoryFilter) -> Self {
        Self { provider, filter }
    }
}

/// Fetch requests from every source, one after another, and concatenate them.
///
/// Sources are queried in order. The first error stops the run and is
/// returned as is; later sources are not contacted.
pub async fn gather(sources: &[Source]) -> Result<Vec<Request>> {
    let mut requests = Vec::new();

    for (index, source) in sources.iter().enumerate() {
        let provider = source.provider.provider_name();
        debug!(source = index, provider, "Fetching requests");

        let mut fetched = source.provider.get_requests(&source.filter).await?;
        info!(
            source = index,
            provider,
            count = fetched.len(),
            "Fetched requests"
        );
        requests.append(&mut fetched);
    }

    Ok(requests)
}
