//! Wiring between configuration, providers and formatters.
//!
//! [`run`] is everything the binary does after parsing arguments and
//! loading the config: build one provider per source, gather their
//! requests in order, sort them, and render the listing.

use gitreq_core::{
    gather, sort_requests, Config, Error, GitHubSourceConfig, GitLabSourceConfig, Provider,
    RepositoryFilter, Result, Source, SourceConfig,
};
use gitreq_format::{build_formatter, FormatArgs};
use gitreq_github::GitHubClient;
use gitreq_gitlab::GitLabClient;
use tracing::{debug, info};

/// Build the provider for one configured source.
pub fn build_provider(config: &SourceConfig) -> Result<Box<dyn Provider>> {
    match config {
        SourceConfig::GitHub(c) => Ok(Box::new(github_provider(c)?)),
        SourceConfig::GitLab(c) => Ok(Box::new(gitlab_provider(c)?)),
    }
}

fn github_provider(config: &GitHubSourceConfig) -> Result<GitHubClient> {
    if config.token.is_none() && config.user.is_none() {
        return Err(Error::Config(
            "github source needs a token or a user".to_string(),
        ));
    }

    let client = match &config.host {
        Some(host) => GitHubClient::with_base_url(host, config.token.clone())?,
        None => GitHubClient::new(config.token.clone())?,
    };

    Ok(match &config.user {
        Some(user) => client.with_user(user),
        None => client,
    })
}

fn gitlab_provider(config: &GitLabSourceConfig) -> Result<GitLabClient> {
    let token = config
        .token
        .as_deref()
        .ok_or_else(|| Error::Config("gitlab source needs a token".to_string()))?;

    let client = match &config.host {
        Some(host) => GitLabClient::with_base_url(host, token)?,
        None => GitLabClient::new(token)?,
    };

    Ok(client.with_skip_wip(config.skip_wip))
}

/// Build every configured source, in configuration order.
pub fn build_sources(config: &Config) -> Result<Vec<Source>> {
    config
        .sources
        .iter()
        .map(|source| {
            let filter = RepositoryFilter::new(source.repositories())?;
            let provider = build_provider(source)?;
            debug!(api = source.api(), "Source configured");
            Ok(Source::new(provider, filter))
        })
        .collect()
}

/// Fetch, sort and render the listing described by `config`.
pub async fn run(config: &Config) -> Result<String> {
    let timezone = config.timezone()?;
    let sources = build_sources(config)?;

    let mut requests = gather(&sources).await?;
    info!(count = requests.len(), "Requests gathered");

    sort_requests(&mut requests, config.sort_by.as_deref());

    let args = FormatArgs::new(requests).with_timezone(timezone);
    let formatter = build_formatter(config.format, args)?;
    Ok(formatter.to_string())
}
