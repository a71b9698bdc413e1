use serde::{Deserialize, Serialize};

/// A user. Most endpoints return only a subset of these fields.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    pub full_name: String,
    pub profile_picture: String,
    pub bio: String,
    pub website: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<UserCounts>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct UserCounts {
    pub media: i64,
    pub follows: i64,
    pub followed_by: i64,
}

/// A user tagged in a media, with where they appear in it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct UserPosition {
    pub user: User,
    pub position: Position,
}

/// Relative position within a media, each axis in `0.0..=1.0`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}
