//! Task store state machine.
//!
//! # Responsibility
//! - Own the task collection, the active filter, and the pending drafts.
//! - Mirror every collection mutation to the snapshot backend.
//!
//! # Invariants
//! - The in-memory collection is authoritative; a failed save degrades
//!   durability, never correctness.
//! - Insertion order is preserved; no operation reorders tasks.

pub mod task_store;
