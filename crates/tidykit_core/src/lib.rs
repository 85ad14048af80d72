//! Headless application core for tidykit: to-do list, storefront orders
//! and quiz sessions.

pub mod bundle;
pub mod db;
pub mod kv;
pub mod list;
pub mod logging;
pub mod model;
pub mod notify;
pub mod service;

pub use bundle::{
    bundled_products, bundled_quiz_questions, decode_file, decode_slice, BundleError,
};
pub use kv::{KeyValueStore, KvError, KvResult, MemoryKeyValueStore, SqliteKeyValueStore};
pub use list::{filter_and_sort, FilteredListCache, SortOption};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::product::{AppSetting, Order, OrderId, OrderValidationError, Product};
pub use model::quiz::QuizQuestion;
pub use model::todo::{TodoId, TodoItem};
pub use notify::ChangeNotifier;
pub use service::quiz_service::{QuizConfig, QuizError, QuizEvent, QuizSession, QuizSnapshot};
pub use service::store_service::{MartStore, StoreConfig, StoreError, StoreEvent};
pub use service::todo_service::{TodoConfig, TodoError, TodoEvent, TodoService};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
