mod common;
pub use self::common::{Params, Query};

mod media;
pub use self::media::RecentMediaQuery;
