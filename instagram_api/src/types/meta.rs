use serde::{Deserialize, Serialize};

use super::{Comment, Media, User};
use crate::pagination::Pagination;

/// Status block present on every response.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Meta {
    pub code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Meta {
    pub fn is_ok(&self) -> bool {
        self.code == 200
    }
}

/// Envelope with only the status block, used to read error bodies.
#[derive(Deserialize, Debug, Default)]
pub struct MetaResponse {
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// Behaviour shared by every decoded response envelope.
pub trait Envelope {
    fn meta(&self) -> Option<&Meta>;

    /// Stores the verbatim response body. Called only when capture is enabled.
    fn set_raw_body(&mut self, raw: String);
}

macro_rules! impl_envelope {
    ($($ty:ty),*) => {
        $(
            impl Envelope for $ty {
                fn meta(&self) -> Option<&Meta> {
                    self.meta.as_ref()
                }

                fn set_raw_body(&mut self, raw: String) {
                    self.raw_body = Some(raw);
                }
            }
        )*
    };
}

impl_envelope!(UserResponse, PaginatedMediaResponse, CommentsResponse);

/// Response for `GET /users/self`.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct UserResponse {
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub data: Option<User>,
    /// The body exactly as received, when raw capture is enabled on the client.
    #[serde(skip)]
    pub raw_body: Option<String>,
}

/// Response for `GET /users/self/media/recent` and its follow-up pages.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct PaginatedMediaResponse {
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub data: Vec<Media>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(skip)]
    pub raw_body: Option<String>,
}

/// Response for `GET /media/{id}/comments`.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct CommentsResponse {
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub data: Vec<Comment>,
    #[serde(skip)]
    pub raw_body: Option<String>,
}
