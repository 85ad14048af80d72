//! To-do list use-cases.
//!
//! # Responsibility
//! - Own the backing to-do collection plus query/sort state.
//! - Persist the full collection to a `KeyValueStore` after every mutation.
//! - Expose the memoized derived list for display.
//!
//! # Invariants
//! - Mutations are applied in memory first, then persisted. A failed write
//!   restores the exact previous in-memory state and fills the error slot.
//! - The derived-list cache is invalidated on every mutation, including
//!   rolled-back ones.
//! - Log lines carry ids and counts only, never titles.

use crate::kv::KeyValueStore;
use crate::list::{FilteredListCache, SortOption};
use crate::model::todo::{decode_todos, encode_todos, TodoId, TodoItem};
use crate::notify::ChangeNotifier;
use chrono::SubsecRound;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use tokio::sync::broadcast;

/// Key the to-do collection is stored under by default.
pub const DEFAULT_TODO_STORAGE_KEY: &str = "todos";

/// Storage settings for [`TodoService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    pub storage_key: String,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_TODO_STORAGE_KEY.to_string(),
        }
    }
}

/// User-facing failure kinds. Each maps to one fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TodoError {
    Save,
    Load,
    Update,
    Delete,
}

impl TodoError {
    pub fn message(self) -> &'static str {
        match self {
            Self::Save => "An error occurred while saving the to-do.",
            Self::Load => "An error occurred while loading the to-dos.",
            Self::Update => "An error occurred while updating the to-do.",
            Self::Delete => "An error occurred while deleting the to-do.",
        }
    }

    fn operation(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Load => "load",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl Display for TodoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for TodoError {}

/// Published after each state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoEvent {
    Loaded { count: usize },
    Added(TodoId),
    Toggled { id: TodoId, is_completed: bool },
    Deleted(TodoId),
    Updated(TodoId),
    RolledBack(TodoError),
    QueryChanged,
    SortChanged(SortOption),
    ErrorCleared,
}

/// To-do list state holder over an injected key-value store.
pub struct TodoService<S: KeyValueStore> {
    storage: S,
    config: TodoConfig,
    items: Vec<TodoItem>,
    query: String,
    sort: SortOption,
    cache: FilteredListCache,
    error: Option<TodoError>,
    notifier: ChangeNotifier<TodoEvent>,
}

impl<S: KeyValueStore> TodoService<S> {
    /// Creates a service with default settings and loads stored to-dos.
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, TodoConfig::default())
    }

    /// Creates a service and loads stored to-dos.
    ///
    /// A load failure leaves the collection empty and fills the error slot.
    pub fn with_config(storage: S, config: TodoConfig) -> Self {
        let mut service = Self {
            storage,
            config,
            items: Vec::new(),
            query: String::new(),
            sort: SortOption::default(),
            cache: FilteredListCache::new(),
            error: None,
            notifier: ChangeNotifier::new(),
        };
        service.reload();
        service
    }

    /// Replaces in-memory state with the stored collection.
    pub fn reload(&mut self) {
        let status = match self.read_stored() {
            Ok(items) => {
                self.items = items;
                "ok"
            }
            Err(err) => {
                self.items = Vec::new();
                self.error = Some(err);
                "error"
            }
        };
        self.cache.invalidate();
        info!(
            "event=todo_load module=todo_service status={status} count={}",
            self.items.len()
        );
        self.notifier.notify(TodoEvent::Loaded {
            count: self.items.len(),
        });
    }

    /// Appends `item` and persists. Undone on write failure.
    ///
    /// An item whose id is already present is ignored. The date is kept at
    /// whole-second precision, matching what storage holds.
    pub fn add_todo(&mut self, mut item: TodoItem) -> Result<(), TodoError> {
        if self.position(item.id).is_some() {
            warn!(
                "event=todo_add module=todo_service status=skipped reason=duplicate_id id={}",
                item.id
            );
            return Ok(());
        }

        let id = item.id;
        item.date = item.date.trunc_subsecs(0);
        self.items.push(item);
        self.commit("add", TodoError::Save, TodoEvent::Added(id), |items| {
            items.pop();
        })
    }

    /// Flips the completion flag of the to-do with `id`. Unknown ids are a
    /// no-op.
    pub fn toggle_todo(&mut self, id: TodoId) -> Result<(), TodoError> {
        let Some(index) = self.position(id) else {
            return Ok(());
        };

        let previous = self.items[index].is_completed;
        self.items[index].is_completed = !previous;
        let event = TodoEvent::Toggled {
            id,
            is_completed: !previous,
        };
        self.commit("toggle", TodoError::Update, event, move |items| {
            items[index].is_completed = previous;
        })
    }

    /// Removes the to-do with `id`. Unknown ids are a no-op.
    pub fn delete_todo(&mut self, id: TodoId) -> Result<(), TodoError> {
        let Some(index) = self.position(id) else {
            return Ok(());
        };

        let removed = self.items.remove(index);
        self.commit("delete", TodoError::Delete, TodoEvent::Deleted(id), move |items| {
            items.insert(index, removed);
        })
    }

    /// Replaces the stored record that shares `item.id`. Unknown ids are a
    /// no-op.
    pub fn update_todo(&mut self, mut item: TodoItem) -> Result<(), TodoError> {
        let Some(index) = self.position(item.id) else {
            return Ok(());
        };

        let id = item.id;
        item.date = item.date.trunc_subsecs(0);
        let previous = std::mem::replace(&mut self.items[index], item);
        self.commit("update", TodoError::Update, TodoEvent::Updated(id), move |items| {
            items[index] = previous;
        })
    }

    /// Filtered and sorted view of the collection for the current query and
    /// sort option.
    pub fn visible_items(&mut self) -> &[TodoItem] {
        self.cache.get_or_compute(&self.items, &self.query, self.sort)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.cache.invalidate();
            self.notifier.notify(TodoEvent::QueryChanged);
        }
    }

    pub fn set_sort_option(&mut self, sort: SortOption) {
        if sort != self.sort {
            self.sort = sort;
            self.cache.invalidate();
            self.notifier.notify(TodoEvent::SortChanged(sort));
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort_option(&self) -> SortOption {
        self.sort
    }

    /// Backing collection in insertion order.
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn last_error(&self) -> Option<TodoError> {
        self.error
    }

    /// Message for the current error slot, if any.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.map(TodoError::message)
    }

    pub fn clear_error(&mut self) {
        if self.error.take().is_some() {
            self.notifier.notify(TodoEvent::ErrorCleared);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TodoEvent> {
        self.notifier.subscribe()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Persists the already applied mutation, running `undo` when the write
    /// fails.
    fn commit<F>(
        &mut self,
        op: &'static str,
        failure: TodoError,
        event: TodoEvent,
        undo: F,
    ) -> Result<(), TodoError>
    where
        F: FnOnce(&mut Vec<TodoItem>),
    {
        self.cache.invalidate();

        match self.write_stored() {
            Ok(()) => {
                info!(
                    "event=todo_mutation module=todo_service op={op} status=ok count={}",
                    self.items.len()
                );
                self.notifier.notify(event);
                Ok(())
            }
            Err(details) => {
                undo(&mut self.items);
                self.cache.invalidate();
                self.error = Some(failure);
                error!(
                    "event=todo_mutation module=todo_service op={op} status=rolled_back error_code={}_error count={} error={}",
                    failure.operation(),
                    self.items.len(),
                    details
                );
                self.notifier.notify(TodoEvent::RolledBack(failure));
                Err(failure)
            }
        }
    }

    fn read_stored(&self) -> Result<Vec<TodoItem>, TodoError> {
        let bytes = match self.storage.get(&self.config.storage_key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Ok(Vec::new()),
            Err(err) => {
                error!("event=todo_load module=todo_service status=error error={err}");
                return Err(TodoError::Load);
            }
        };
        decode_todos(&bytes).map_err(|err| {
            error!(
                "event=todo_load module=todo_service status=error error_code=decode_failed error={err}"
            );
            TodoError::Load
        })
    }

    fn write_stored(&mut self) -> Result<(), String> {
        let bytes = encode_todos(&self.items).map_err(|err| err.to_string())?;
        self.storage
            .set(&self.config.storage_key, &bytes)
            .map_err(|err| err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{TodoError, TodoEvent, TodoService};
    use crate::kv::{KeyValueStore, MemoryKeyValueStore};
    use crate::model::todo::TodoItem;

    #[test]
    fn add_rollback_publishes_rolled_back_event() {
        let mut service = TodoService::new(MemoryKeyValueStore::new());
        let mut rx = service.subscribe();
        service.storage_mut().set_fail_writes(true);

        let err = service.add_todo(TodoItem::new("x")).unwrap_err();
        assert_eq!(err, TodoError::Save);
        assert_eq!(rx.try_recv().unwrap(), TodoEvent::RolledBack(TodoError::Save));
        assert!(service.items().is_empty());
    }

    #[test]
    fn successful_mutation_does_not_clear_existing_error() {
        let store = MemoryKeyValueStore::new().with_entry("todos", b"not json".to_vec());
        let mut service = TodoService::new(store);
        assert_eq!(service.last_error(), Some(TodoError::Load));

        service.add_todo(TodoItem::new("x")).unwrap();
        assert_eq!(service.last_error(), Some(TodoError::Load));
        assert!(service.storage().get("todos").unwrap().is_some());
    }
}
