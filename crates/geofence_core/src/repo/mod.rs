//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value slot contract the reminder store persists through.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - A slot write replaces the whole value in one statement.

pub mod slot_repo;
