//! Sorting of aggregated requests.

use std::cmp::Ordering;

use crate::types::Request;

/// Field a request listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Name,
    State,
    Url,
    Created,
    Updated,
    #[default]
    Repository,
}

impl SortKey {
    /// Look up a sort key by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(SortKey::Name),
            "state" => Some(SortKey::State),
            "url" => Some(SortKey::Url),
            "created" => Some(SortKey::Created),
            "updated" => Some(SortKey::Updated),
            "repository" => Some(SortKey::Repository),
            _ => None,
        }
    }

    fn compare(self, a: &Request, b: &Request) -> Ordering {
        match self {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::State => a.state.cmp(&b.state),
            SortKey::Url => a.url.cmp(&b.url),
            SortKey::Created => a.created.cmp(&b.created),
            SortKey::Updated => a.updated.cmp(&b.updated),
            SortKey::Repository => a.repository.cmp(&b.repository),
        }
    }
}

/// Sort requests by the named field.
///
/// `None` sorts by repository. An unrecognized name leaves the slice in its
/// current order. The sort is stable, so ties keep their concatenation order.
pub fn sort_requests(requests: &mut [Request], sort_by: Option<&str>) {
    let key = match sort_by {
        None => SortKey::default(),
        Some(name) => match SortKey::from_name(name) {
            Some(key) => key,
            None => {
                tracing::debug!(sort_by = name, "Unknown sort key, keeping source order");
                return;
            }
        },
    };

    requests.sort_by(|a, b| key.compare(a, b));
}
