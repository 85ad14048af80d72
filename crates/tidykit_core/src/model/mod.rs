//! Domain records shared by services.
//!
//! # Responsibility
//! - Define the persisted shapes for to-dos, storefront orders and quiz
//!   questions.
//! - Keep wire field names stable (`camelCase`) for existing data files.
//!
//! # Invariants
//! - Record identity never changes after creation.
//! - Timestamps are UTC with whole-second precision.

pub mod product;
pub mod quiz;
pub mod todo;
