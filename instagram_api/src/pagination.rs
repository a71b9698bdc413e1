//! Cursor-based pagination: how to fetch the page after the current one.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::query::Params;
use crate::sign::SIG_PARAM;
use crate::types::{Envelope, Media, PaginatedMediaResponse};
use crate::Error;

/// Describes how to get the next page of results.
///
/// An empty or missing `next_url` means there are no more pages. That is
/// the only end-of-results signal; page size and item counts are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_url: Option<String>,
    /// Opaque id of the oldest item on this page. Not used when following `next_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_max_id: Option<String>,
}

/// Outcome of [`Pagination::next_page`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    Done,
    Fetch(NextRequest),
}

/// Everything needed to request the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextRequest {
    /// The next URL without its query string.
    pub uri: Url,
    /// The path with any leading API version segment removed, used for signing.
    pub path: String,
    /// The next URL's query parameters, minus the stale `sig`.
    pub params: Params,
}

impl Pagination {
    pub fn is_done(&self) -> bool {
        self.next_url.as_deref().map_or(true, str::is_empty)
    }

    /// Splits `next_url` into a query-less URI, a signing path and the
    /// parameters to re-sign. The old `sig` was computed for the previous
    /// request and is dropped.
    pub fn next_page(&self) -> Result<NextPage, Error> {
        let next_url = match self.next_url.as_deref() {
            None | Some("") => return Ok(NextPage::Done),
            Some(u) => u,
        };

        let mut uri = Url::parse(next_url).map_err(|e| {
            tracing::error!("Invalid pagination url {}: {}", next_url, e);
            Error::Decode(format!("invalid pagination next_url: {}", e))
        })?;

        let mut params = Params::from_url(&uri);
        params.remove(SIG_PARAM);
        uri.set_query(None);
        let path = strip_version_prefix(uri.path()).to_string();

        Ok(NextPage::Fetch(NextRequest { uri, path, params }))
    }
}

/// Removes a leading `/v<digits>` segment, so `/v1/users/self` becomes `/users/self`.
fn strip_version_prefix(path: &str) -> &str {
    let Some(rest) = path.strip_prefix('/') else {
        return path;
    };
    let (segment, tail) = match rest.find('/') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    let is_version = segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].bytes().all(|b| b.is_ascii_digit());
    match (is_version, tail) {
        (false, _) => path,
        (true, "") => "/",
        (true, tail) => tail,
    }
}

/// A decoded response that holds one page of a paginated listing.
pub trait Page: DeserializeOwned + Envelope + Send + 'static {
    type Item: Send + 'static;

    /// Consumes the page, returning its items and its cursor.
    fn into_parts(self) -> (Vec<Self::Item>, Option<Pagination>);
}

impl Page for PaginatedMediaResponse {
    type Item = Media;

    fn into_parts(self) -> (Vec<Media>, Option<Pagination>) {
        (self.data, self.pagination)
    }
}
