//! Derived display lists.
//!
//! # Responsibility
//! - Filter to-dos by a title query and order them by a sort option.
//! - Memoize the derived list for the current `(query, sort)` pair.
//!
//! # Invariants
//! - Derived list == `sort(filter(items, query), sort)`; nothing is dropped
//!   or duplicated except by the filter predicate.
//! - Any change to the backing items invalidates the whole cache.

pub mod cache;
pub mod sort;

pub use cache::{filter_and_sort, FilteredListCache};
pub use sort::{localized_compare, SortOption};
