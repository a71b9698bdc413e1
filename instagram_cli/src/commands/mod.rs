pub mod access_token;
pub mod comments;
pub mod iterate;
pub mod me;
pub mod recent;
