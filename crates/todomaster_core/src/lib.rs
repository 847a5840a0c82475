//! Core domain logic for Todo Master.
//!
//! Owns the task collection, its state transitions, and the snapshot
//! persistence that mirrors every mutation. Rendering is an external
//! collaborator: it observes change events and reads the derived views, but
//! never holds state of its own.

pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Counts, Filter, Task, TaskId, TaskValidationError};
pub use persist::{
    decode_snapshot, encode_snapshot, PersistError, PersistResult, SnapshotStore,
    SqliteSnapshotStore, SNAPSHOT_KEY,
};
pub use store::task_store::{ChangeEvent, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
