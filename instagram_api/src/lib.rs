//! Minimal client for the Instagram REST API: signed GET requests, typed
//! responses, cursor pagination and a cancellable iterator over pages.

mod auth;
mod client;
mod context;
mod credentials;
mod errors;
mod iterate;
pub mod pagination;
mod query;
pub mod sign;
pub mod types;
pub use self::auth::{OAuth, ACCESS_TOKEN_URL, AUTHORIZE_URL};
pub use self::client::{Client, DEFAULT_BASE_URL};
pub use self::context::Context;
pub use self::credentials::Credentials;
pub use self::errors::{ApiError, ContextError, Error, OAuthError};
pub use self::iterate::PageStream;
pub use self::pagination::{NextPage, NextRequest, Page, Pagination};
pub use self::query::{Params, Query, RecentMediaQuery};
