pub mod log;
pub mod summary;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::sentiment::Sentiment;

pub use log::{load_records, InteractionLog};
pub use summary::{summarize, InteractionSummary};

/// Thumbs up/down given by the citizen after reading a reply
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Positive,
    Negative,
}

/// One logged question/answer/sentiment tuple
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Older logs carry no id; nil until `assign_legacy_ids` runs on load
    #[serde(default)]
    pub id: Uuid,
    pub user_query: String,
    pub reply: String,
    pub sentiment: Sentiment,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<Rating>,
}

impl InteractionRecord {
    /// New unrated record stamped with the server clock
    pub fn new(user_query: String, reply: String, sentiment: Sentiment) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_query,
            reply,
            sentiment,
            timestamp: Utc::now(),
            user_rating: None,
        }
    }
}

/// Give records loaded without an id a UUID v5 derived from their position
/// and content. Appends never reorder earlier records, so repeated loads agree.
pub(crate) fn assign_legacy_ids(records: &mut [InteractionRecord]) -> usize {
    let mut assigned = 0;
    for (index, record) in records.iter_mut().enumerate() {
        if record.id.is_nil() {
            let key = format!(
                "{}\n{}\n{}\n{}",
                index,
                record.timestamp.to_rfc3339(),
                record.user_query,
                record.reply
            );
            record.id = Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes());
            assigned += 1;
        }
    }
    assigned
}

/// RFC 3339, or a naive ISO-8601 datetime (older logs) taken as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod store_tests;
