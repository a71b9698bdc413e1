//! Error types for the API client.

use std::fmt;

use crate::types::Meta;

/// Errors that can occur when building or making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The client was constructed with an invalid set of credentials.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// The request could not be built locally (e.g. conflicting query strings).
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    /// The request failed at the network level (DNS, TLS, connection reset,
    /// HTTP client timeout). Safe to retry.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// The governing context was cancelled or its deadline passed.
    #[error(transparent)]
    Context(#[from] ContextError),
    /// The service rejected the request with a structured `meta` block.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The response body could not be decoded into the expected shape.
    #[error("error decoding body: {0}")]
    Decode(String),
    /// The OAuth redirect could not be turned into an authorization code.
    #[error(transparent)]
    OAuth(#[from] OAuthError),
}

impl Error {
    /// Returns true if the error came from cancellation or an expired deadline.
    pub fn is_context(&self) -> bool {
        matches!(self, Error::Context(_))
    }

    /// Timeouts of the HTTP client itself stay `Transport`; only the
    /// governing [`crate::Context`] produces `Context` errors.
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::Decode(e.to_string())
        } else {
            Error::Transport(e)
        }
    }
}

/// Why a context stopped a call.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("context canceled")]
    Canceled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// A structured rejection from the service, carried verbatim from `meta`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: i64,
    pub error_type: String,
    pub error_message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error making api call: code {} {} {}",
            self.code, self.error_type, self.error_message
        )
    }
}

impl std::error::Error for ApiError {}

impl From<Meta> for ApiError {
    fn from(meta: Meta) -> Self {
        Self {
            code: meta.code,
            error_type: meta.error_type.unwrap_or_default(),
            error_message: meta.error_message.unwrap_or_default(),
        }
    }
}

/// Failures while reading the OAuth redirect.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OAuthError {
    #[error("state does not match")]
    StateMismatch,
    #[error("missing code")]
    MissingCode,
    #[error("missing access token in response")]
    MissingToken,
}
