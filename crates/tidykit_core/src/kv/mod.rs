//! Key-value storage capability.
//!
//! # Responsibility
//! - Define the small `get`/`set`/`remove` contract services persist through.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - Values are opaque bytes; callers own the encoding.
//! - A failed `set` leaves the previous value in place.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

pub type KvResult<T> = Result<T, KvError>;

/// Key-value storage failures.
#[derive(Debug)]
pub enum KvError {
    Db(DbError),
    /// Backend refused the operation (injected failures, read-only media).
    Unavailable { key: String, operation: &'static str },
    /// Stored bytes do not match the requested typed shape.
    InvalidValue { key: String, details: String },
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable { key, operation } => {
                write!(f, "key-value store unavailable for {operation} of `{key}`")
            }
            Self::InvalidValue { key, details } => {
                write!(f, "invalid value stored under `{key}`: {details}")
            }
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistent mapping from string keys to opaque byte values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>>;
    fn set(&mut self, key: &str, value: &[u8]) -> KvResult<()>;
    fn remove(&mut self, key: &str) -> KvResult<()>;

    /// Reads a decimal integer; a missing key reads as `0`.
    fn get_integer(&self, key: &str) -> KvResult<i64> {
        let Some(bytes) = self.get(key)? else {
            return Ok(0);
        };
        let text = std::str::from_utf8(&bytes).map_err(|err| KvError::InvalidValue {
            key: key.to_string(),
            details: err.to_string(),
        })?;
        text.trim().parse::<i64>().map_err(|err| KvError::InvalidValue {
            key: key.to_string(),
            details: err.to_string(),
        })
    }

    /// Stores an integer as decimal text.
    fn set_integer(&mut self, key: &str, value: i64) -> KvResult<()> {
        self.set(key, value.to_string().as_bytes())
    }
}
