//! One-slot memo for the filtered and sorted to-do list.

use super::sort::SortOption;
use crate::model::todo::TodoItem;

/// Filters `items` by `query` and orders the result by `sort`.
///
/// The sort is stable: items equal under every key keep backing order.
pub fn filter_and_sort(items: &[TodoItem], query: &str, sort: SortOption) -> Vec<TodoItem> {
    let mut visible: Vec<TodoItem> = items
        .iter()
        .filter(|item| item.matches_query(query))
        .cloned()
        .collect();
    visible.sort_by(|first, second| sort.compare(first, second));
    visible
}

#[derive(Debug, Clone)]
struct CacheSlot {
    query: String,
    sort: SortOption,
    items: Vec<TodoItem>,
}

/// Caches the last derived list keyed on `(query, sort)`.
///
/// Callers must call [`FilteredListCache::invalidate`] after every change to
/// the backing items; the key does not cover item contents.
#[derive(Debug, Clone, Default)]
pub struct FilteredListCache {
    slot: Option<CacheSlot>,
    computations: u64,
}

impl FilteredListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached list when the key matches, recomputing otherwise.
    pub fn get_or_compute(
        &mut self,
        items: &[TodoItem],
        query: &str,
        sort: SortOption,
    ) -> &[TodoItem] {
        let hit = matches!(&self.slot, Some(slot) if slot.query == query && slot.sort == sort);
        if !hit {
            self.computations += 1;
            self.slot = Some(CacheSlot {
                query: query.to_string(),
                sort,
                items: filter_and_sort(items, query, sort),
            });
        }
        match &self.slot {
            Some(slot) => slot.items.as_slice(),
            None => &[],
        }
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    pub fn is_populated(&self) -> bool {
        self.slot.is_some()
    }

    /// Number of recomputations since creation.
    pub fn computations(&self) -> u64 {
        self.computations
    }
}
