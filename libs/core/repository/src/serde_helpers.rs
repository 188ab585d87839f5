//! Serde adapters storing chrono timestamps as BSON datetimes.
//!
//! Range filters and sorts compare stored values, so timestamp fields are
//! persisted as real BSON datetimes (millisecond precision) rather than
//! formatted strings. [`now_millis`] produces timestamps already truncated
//! to that precision, so records compare equal across a storage round
//! trip.

use chrono::{DateTime, Utc};
use mongodb::bson;

/// The current time truncated to milliseconds, the storage granularity.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// `DateTime<Utc>` as a BSON datetime. Use with `#[serde(with = ...)]`.
pub mod datetime {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        bson::DateTime::from_millis(value.timestamp_millis()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = bson::DateTime::deserialize(deserializer)?;
        DateTime::from_timestamp_millis(raw.timestamp_millis())
            .ok_or_else(|| serde::de::Error::custom("BSON datetime out of chrono range"))
    }
}

/// `Option<DateTime<Utc>>` as a nullable BSON datetime. `None` serializes
/// to an explicit null so cleared fields (`deleted_at` after a restore)
/// overwrite the stored value.
pub mod optional_datetime {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(datetime) => {
                serializer.serialize_some(&bson::DateTime::from_millis(datetime.timestamp_millis()))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<bson::DateTime>::deserialize(deserializer)?;
        raw.map(|value| {
            DateTime::from_timestamp_millis(value.timestamp_millis())
                .ok_or_else(|| serde::de::Error::custom("BSON datetime out of chrono range"))
        })
        .transpose()
    }
}
