//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory reminder collection and its persistence discipline.
//! - Route location events through proximity evaluation to observers.
//! - Keep UI/FFI shells decoupled from storage details.

pub mod reminder_store;
pub mod session;
