//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical task record and its derived views.
//! - Keep validation rules next to the data they protect.
//!
//! # Invariants
//! - Every task is identified by a session-unique `TaskId`.
//! - A task title is never empty or whitespace-only.

pub mod task;
