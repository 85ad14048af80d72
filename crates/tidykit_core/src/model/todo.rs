//! To-do record.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one to-do.
pub type TodoId = Uuid;

/// One to-do entry.
///
/// Serialized as `{id, title, isCompleted, date}` with `date` in ISO-8601
/// (`2025-01-19T09:30:00Z`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: TodoId,
    pub title: String,
    pub is_completed: bool,
    #[serde(with = "iso8601_seconds")]
    pub date: DateTime<Utc>,
}

impl TodoItem {
    /// Creates an open to-do dated now with a fresh id.
    ///
    /// The title is trimmed of surrounding whitespace.
    pub fn new(title: impl AsRef<str>) -> Self {
        Self::with_date(title, Utc::now())
    }

    /// Creates an open to-do with a caller-provided date.
    pub fn with_date(title: impl AsRef<str>, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.as_ref().trim().to_string(),
            is_completed: false,
            date: date.trunc_subsecs(0),
        }
    }

    /// Returns a copy with the completion flag set.
    pub fn completed(mut self, is_completed: bool) -> Self {
        self.is_completed = is_completed;
        self
    }

    /// Whether the title contains `query`, ignoring case. An empty query
    /// matches every item.
    pub fn matches_query(&self, query: &str) -> bool {
        query.is_empty() || self.title.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Encodes the to-do list in its persisted JSON form.
pub fn encode_todos(items: &[TodoItem]) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(items)
}

/// Decodes the persisted JSON form.
pub fn decode_todos(bytes: &[u8]) -> serde_json::Result<Vec<TodoItem>> {
    serde_json::from_slice(bytes)
}

mod iso8601_seconds {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text)
            .map(|value| value.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
