//! Use-case services (state holders behind each screen).
//!
//! # Responsibility
//! - Own mutable application state and route changes through storage.
//! - Publish change events so presentation layers can refresh.

pub mod quiz_service;
pub mod store_service;
pub mod todo_service;
