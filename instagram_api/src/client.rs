//! HTTP client for the Instagram REST API.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    context::Context,
    credentials::Credentials,
    errors::ApiError,
    pagination::{NextPage, NextRequest, Page, Pagination},
    query::{Params, Query, RecentMediaQuery},
    sign::sign,
    types::{CommentsResponse, Envelope, MetaResponse, PaginatedMediaResponse, UserResponse},
    Error,
};

/// Production API root. Paths such as `/users/self` are appended to it.
pub const DEFAULT_BASE_URL: &str = "https://api.instagram.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error bodies are only read up to this many bytes.
const MAX_ERROR_BODY: usize = 64 * 1024;

/// HTTP client for the Instagram REST API.
///
/// Every request is authenticated with the access token, or the client id
/// when no token is set. With `enforce_signed_request` every request also
/// carries a `sig` parameter (see [`crate::sign`]).
///
/// The client holds no per-request state, so clones can be shared freely
/// across tasks. Raw bodies, when captured, come back on each response.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    credentials: Credentials,
    enforce_signed_request: bool,
    keep_raw_body: bool,
    /// Base URL for the API. Defaults to [`DEFAULT_BASE_URL`].
    base_api_url: String,
}

impl Client {
    /// Creates a client pointing at the production API.
    ///
    /// Fails if neither a client id nor an access token is set, or if
    /// signing is enforced without a client secret.
    pub fn new(credentials: Credentials, enforce_signed_request: bool) -> Result<Self, Error> {
        credentials.validate(enforce_signed_request)?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Transport(e)
            })?;
        Ok(Self {
            http,
            credentials,
            enforce_signed_request,
            keep_raw_body: false,
            base_api_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Points the client at a different API root. Used for testing with wiremock.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_api_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Replaces the underlying HTTP client (proxies, custom timeouts, ...).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// When enabled, each decoded response also carries its body verbatim.
    pub fn with_raw_body(mut self, keep_raw_body: bool) -> Self {
        self.keep_raw_body = keep_raw_body;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn enforces_signed_requests(&self) -> bool {
        self.enforce_signed_request
    }

    /// Adds the auth parameter, then the signature if signing is enforced.
    fn authorize(&self, path: &str, mut params: Params) -> Params {
        if let Some((key, value)) = self.credentials.auth_param() {
            params.set(key, value);
        }
        self.sign_if_enforced(path, params)
    }

    fn sign_if_enforced(&self, path: &str, params: Params) -> Params {
        match self.credentials.client_secret() {
            Some(secret) if self.enforce_signed_request => sign(path, params, secret),
            _ => params,
        }
    }

    /// Sends an authenticated GET for `path` (e.g. `/users/self`) and decodes
    /// the response into `T`.
    ///
    /// `params` is consumed: the auth parameter and `sig` are added to it
    /// before it becomes the query string.
    pub async fn get<T>(&self, ctx: &Context, path: &str, params: Params) -> Result<T, Error>
    where
        T: DeserializeOwned + Envelope,
    {
        let params = self.authorize(path, params);
        let url = build_get_url(&format!("{}{}", self.base_api_url, path), &params)?;
        ctx.run(self.send(url)).await
    }

    /// Follows a pagination cursor. Returns `Ok(None)` without making a
    /// request when the cursor reports there are no more pages.
    ///
    /// The next URL already carries the auth parameter; only the signature
    /// is recomputed.
    pub async fn next_page<P: Page>(
        &self,
        ctx: &Context,
        pagination: &Pagination,
    ) -> Result<Option<P>, Error> {
        let NextRequest { uri, path, params } = match pagination.next_page()? {
            NextPage::Done => return Ok(None),
            NextPage::Fetch(req) => req,
        };
        let params = self.sign_if_enforced(&path, params);
        let url = build_get_url(uri.as_str(), &params)?;
        ctx.run(self.send(url)).await.map(Some)
    }

    async fn send<T>(&self, url: Url) -> Result<T, Error>
    where
        T: DeserializeOwned + Envelope,
    {
        tracing::debug!(
            path = url.path(),
            signed = self.enforce_signed_request,
            "GET"
        );
        let resp = self
            .http
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::from_reqwest(e)
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = read_body(resp, MAX_ERROR_BODY).await?;
            return Err(api_error(status, &body));
        }

        let body = read_body(resp, usize::MAX).await?;
        let mut parsed = decode_json::<T>(&body).map_err(|e| {
            tracing::error!("Failed to parse resource: {} | body: {}", e, truncate_body(&body));
            Error::Decode(e.to_string())
        })?;

        if let Some(meta) = parsed.meta().filter(|m| m.code != 0 && !m.is_ok()) {
            tracing::warn!("API returned meta code {} with HTTP 200", meta.code);
            return Err(ApiError::from(meta.clone()).into());
        }

        if self.keep_raw_body {
            parsed.set_raw_body(String::from_utf8_lossy(&body).into_owned());
        }
        Ok(parsed)
    }

    /// Fetches the authenticated user.
    /// REST API: GET /users/self
    pub async fn get_self(&self, ctx: &Context) -> Result<UserResponse, Error> {
        self.get(ctx, "/users/self", Params::new()).await
    }

    /// Checks client keys and user tokens with a small request.
    ///
    /// A rejection from the service is `Ok(false)`; transport and context
    /// failures are still errors.
    pub async fn verify_credentials(&self, ctx: &Context) -> Result<bool, Error> {
        match self.get_self(ctx).await {
            Ok(_) => Ok(true),
            Err(Error::Api(e)) => {
                tracing::warn!("Credentials rejected: {}", e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetches the most recent media published by the authenticated user.
    /// REST API: GET /users/self/media/recent
    pub async fn get_recent_media(
        &self,
        ctx: &Context,
        query: &RecentMediaQuery,
    ) -> Result<PaginatedMediaResponse, Error> {
        self.get(ctx, "/users/self/media/recent", query.to_params())
            .await
    }

    /// Fetches the page after `pagination`, or `None` if there is none.
    pub async fn next_medias(
        &self,
        ctx: &Context,
        pagination: &Pagination,
    ) -> Result<Option<PaginatedMediaResponse>, Error> {
        self.next_page(ctx, pagination).await
    }

    /// Fetches recent comments on a media. Requires the `comments` scope.
    /// REST API: GET /media/{media-id}/comments
    pub async fn get_media_recent_comments(
        &self,
        ctx: &Context,
        media_id: &str,
    ) -> Result<CommentsResponse, Error> {
        let media_id = path_segment(media_id)?;
        self.get(
            ctx,
            format!("/media/{}/comments", media_id).as_str(),
            Params::new(),
        )
        .await
    }
}

/// Checks that `id` can be placed in a path as-is. Anything that would need
/// escaping (`/`, `?`, `#`, spaces, ...) would make the request path differ
/// from the signed one, so it is rejected.
fn path_segment(id: &str) -> Result<&str, Error> {
    let valid = !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'));
    if valid && id != "." && id != ".." {
        Ok(id)
    } else {
        Err(Error::MalformedRequest(format!("invalid id {:?}", id)))
    }
}

/// Joins `url_str` and `params` into a request URL. A URL that already has a
/// query string is rejected rather than merged.
pub(crate) fn build_get_url(url_str: &str, params: &Params) -> Result<Url, Error> {
    let mut url = Url::parse(url_str).map_err(|e| {
        tracing::error!("Invalid URL constructed: {}", e);
        Error::MalformedRequest(format!("invalid url {}: {}", url_str, e))
    })?;
    if url.query().is_some_and(|q| !q.is_empty()) {
        return Err(Error::MalformedRequest(
            "cannot merge query params in url and params".to_string(),
        ));
    }
    if params.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&params.encode()));
    }
    Ok(url)
}

/// Reads at most `limit` bytes of the body. Anything past the limit is
/// left unread and the connection is dropped with the response.
async fn read_body(mut resp: reqwest::Response, limit: usize) -> Result<Vec<u8>, Error> {
    let mut body = Vec::new();
    while body.len() < limit {
        let chunk = resp.chunk().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::from_reqwest(e)
        })?;
        match chunk {
            Some(chunk) => {
                let take = chunk.len().min(limit - body.len());
                body.extend_from_slice(&chunk[..take]);
            }
            None => break,
        }
    }
    Ok(body)
}

/// Decodes the first JSON value in `body`, ignoring anything after it.
pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    match serde_json::Deserializer::from_slice(body)
        .into_iter::<T>()
        .next()
    {
        Some(result) => result,
        None => serde_json::from_slice(body),
    }
}

/// Classifies a non-200 response. The `meta` block wins when present;
/// otherwise the error is built from the status line.
pub(crate) fn api_error(status: StatusCode, body: &[u8]) -> Error {
    let meta = decode_json::<MetaResponse>(body).ok().and_then(|m| m.meta);
    let err = match meta {
        Some(meta) => ApiError::from(meta),
        None => ApiError {
            code: i64::from(status.as_u16()),
            error_type: String::new(),
            error_message: status.to_string(),
        },
    };
    tracing::warn!("Request failed with status {}: {}", status, truncate_body(body));
    Error::Api(err)
}

fn truncate_body(body: &[u8]) -> String {
    const MAX: usize = 2000;
    let text = String::from_utf8_lossy(body);
    if text.len() <= MAX {
        text.into_owned()
    } else {
        let mut end = MAX;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &text[..end])
    }
}
