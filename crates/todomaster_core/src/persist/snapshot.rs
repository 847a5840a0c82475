//! Snapshot codec for the task collection.
//!
//! # Responsibility
//! - Serialize the full collection to the persisted JSON array layout.
//! - Restore a collection while enforcing model invariants.
//!
//! # Invariants
//! - Encoding then decoding reproduces ids, titles, descriptions, completion
//!   flags, and order exactly.
//! - Decoding rejects duplicate ids and invalid task records as corruption.

use super::{PersistError, PersistResult};
use crate::model::task::{Task, TaskId};
use std::collections::HashSet;

/// Serializes the full collection into the persisted JSON array form.
pub fn encode_snapshot(tasks: &[Task]) -> PersistResult<String> {
    serde_json::to_string(tasks).map_err(PersistError::Encode)
}

/// Restores a collection from a raw stored snapshot.
///
/// Every record is validated and ids must be unique; any violation maps to
/// `PersistError::Corrupt` so the caller can decide between failing fast and
/// falling back to an empty collection.
pub fn decode_snapshot(raw: &str) -> PersistResult<Vec<Task>> {
    let tasks: Vec<Task> = serde_json::from_str(raw)
        .map_err(|err| PersistError::Corrupt(format!("invalid snapshot JSON: {err}")))?;

    let mut seen: HashSet<TaskId> = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        task.validate()?;
        if !seen.insert(task.id) {
            return Err(PersistError::Corrupt(format!(
                "duplicate task id {} in snapshot",
                task.id
            )));
        }
    }

    Ok(tasks)
}
