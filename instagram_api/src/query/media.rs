use super::common::{Params, Query};

/// Query builder for `GET /users/self/media/recent`.
#[derive(Clone, Debug, Default)]
pub struct RecentMediaQuery {
    /// Number of media to return per page. `None` uses the API default.
    pub count: Option<u32>,
    /// Return media earlier than this id.
    pub max_id: Option<String>,
    /// Return media later than this id.
    pub min_id: Option<String>,
    extra: Params,
}

impl Query for RecentMediaQuery {
    fn to_params(&self) -> Params {
        let mut params = self.extra.clone();
        if let Some(count) = self.count {
            params.set("count", count.to_string());
        }
        if let Some(max_id) = self.max_id.as_deref().filter(|s| !s.is_empty()) {
            params.set("max_id", max_id);
        }
        if let Some(min_id) = self.min_id.as_deref().filter(|s| !s.is_empty()) {
            params.set("min_id", min_id);
        }
        params
    }

    fn extra_params(&mut self) -> &mut Params {
        &mut self.extra
    }
}

impl RecentMediaQuery {
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_max_id(mut self, max_id: &str) -> Self {
        self.max_id = Some(max_id.to_string());
        self
    }

    pub fn with_min_id(mut self, min_id: &str) -> Self {
        self.min_id = Some(min_id.to_string());
        self
    }
}
