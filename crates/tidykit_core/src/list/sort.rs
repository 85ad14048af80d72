//! Sort options and comparators for to-do lists.

use crate::model::todo::TodoItem;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Ordering applied to the derived to-do list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Newest first.
    #[default]
    Date,
    /// Open items first, then newest first, then title.
    Completed,
    /// Title ascending, then newest first.
    Title,
}

impl SortOption {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Completed => "completed",
            Self::Title => "title",
        }
    }

    /// Total order over two items for this option.
    pub fn compare(self, first: &TodoItem, second: &TodoItem) -> Ordering {
        let newest_first = second.date.cmp(&first.date);
        match self {
            Self::Date => newest_first,
            Self::Completed => first
                .is_completed
                .cmp(&second.is_completed)
                .then(newest_first)
                .then_with(|| localized_compare(&first.title, &second.title)),
            Self::Title => localized_compare(&first.title, &second.title).then(newest_first),
        }
    }
}

impl Display for SortOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "completed" => Ok(Self::Completed),
            "title" => Ok(Self::Title),
            other => Err(format!(
                "unsupported sort option `{other}`; expected date|completed|title"
            )),
        }
    }
}

/// Human-oriented string order: case-insensitive first, exact bytes as the
/// tie-break so distinct strings never compare equal.
pub fn localized_compare(first: &str, second: &str) -> Ordering {
    first
        .to_lowercase()
        .cmp(&second.to_lowercase())
        .then_with(|| first.cmp(second))
}
