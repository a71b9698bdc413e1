//! Timestamps travel as JSON strings holding base-10 Unix seconds.
//!
//! Use with `#[serde(default, with = "crate::types::time::unix_seconds")]` on an
//! `Option<DateTime<Utc>>` field. `None` encodes as `null`; `null`, a missing
//! field and `""` all decode to `None`.

pub mod unix_seconds {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_str(&t.timestamp().to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => {
                let secs: i64 = s
                    .parse()
                    .map_err(|e| de::Error::custom(format!("invalid unix time {:?}: {}", s, e)))?;
                DateTime::from_timestamp(secs, 0)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("unix time out of range: {}", secs)))
            }
        }
    }
}
