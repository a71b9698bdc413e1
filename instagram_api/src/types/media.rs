use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Location, User, UserPosition};

/// A photo, video or carousel post.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Media {
    #[serde(rename = "type")]
    pub media_type: String,
    pub id: String,
    pub users_in_photo: Vec<UserPosition>,
    pub filter: String,
    pub tags: Vec<String>,
    pub comments: Option<Comments>,
    pub caption: Option<Comment>,
    pub likes: Option<Likes>,
    pub link: String,
    pub user: Option<User>,
    #[serde(with = "super::time::unix_seconds")]
    pub created_time: Option<DateTime<Utc>>,
    pub images: Option<Images>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Images>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub carousel_media: Vec<CarouselMedia>,
    pub location: Option<Location>,
    pub user_has_liked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
}

/// A comment, also used for a media caption.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub from: Option<User>,
    #[serde(with = "super::time::unix_seconds")]
    pub created_time: Option<DateTime<Utc>>,
}

/// Comment count on a media. Nested comment lists are not carried.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Comments {
    pub count: i64,
}

/// Like count on a media. Nested liker lists are not carried.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Likes {
    pub count: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Images {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_resolution: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_bandwidth: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_resolution: Option<Image>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Image {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub url: String,
    pub width: i64,
    pub height: i64,
}

/// One slide of a carousel post.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CarouselMedia {
    #[serde(rename = "type")]
    pub media_type: String,
    pub images: Option<Images>,
    pub videos: Option<Images>,
    pub users_in_photo: Vec<UserPosition>,
}

/// The app that uploaded the media, when it was not the first-party app.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Attribution {
    pub website: String,
    pub itunes_url: String,
    pub name: String,
}
