mod meta;
pub use self::meta::{CommentsResponse, Envelope, Meta, MetaResponse, PaginatedMediaResponse, UserResponse};

pub mod time;

mod location;
pub use self::location::Location;

mod user;
pub use self::user::{User, UserCounts, UserPosition, Position};

mod media;
pub use self::media::{Attribution, CarouselMedia, Comment, Comments, Image, Images, Likes, Media};

pub use crate::pagination::Pagination;
