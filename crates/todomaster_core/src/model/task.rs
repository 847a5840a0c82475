//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record and the transient view filter.
//! - Provide validation used by both the write path and snapshot restore.
//!
//! # Invariants
//! - `id` is unique across every task created in a session and never reused.
//! - `title` is non-empty, not whitespace-only, and stored trimmed.
//! - `description` is stored trimmed and may be empty.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Session-unique identifier assigned at creation, immutable afterwards.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = i64;

/// A single to-do item.
///
/// Field names match the persisted snapshot layout exactly; there is no
/// schema version field, so any shape change is a breaking format change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable ID used for toggle/delete addressing.
    pub id: TaskId,
    /// Short task text. Immutable after creation.
    pub title: String,
    /// Optional longer text. Immutable after creation, may be empty.
    pub description: String,
    /// Completion flag, the only mutable field.
    pub completed: bool,
}

impl Task {
    /// Creates a task from raw user input.
    ///
    /// Both inputs are trimmed before storage. Returns `EmptyTitle` when the
    /// trimmed title is empty; callers that want silent-guard semantics map
    /// that error to a no-op.
    pub fn new(
        id: TaskId,
        title: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> Result<Self, TaskValidationError> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }

        Ok(Self {
            id,
            title: title.to_string(),
            description: description.as_ref().trim().to_string(),
            completed: false,
        })
    }

    /// Checks the record against model invariants.
    ///
    /// Used by snapshot restore so that invalid persisted state is rejected
    /// instead of silently entering the collection.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if self.title != self.title.trim() {
            return Err(TaskValidationError::UntrimmedTitle);
        }
        Ok(())
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Model invariant violations for a task record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Title carries leading or trailing whitespace.
    UntrimmedTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty or whitespace-only"),
            Self::UntrimmedTitle => {
                write!(f, "task title must not carry leading or trailing whitespace")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Visibility criterion for the derived task view.
///
/// Transient by design: it is never persisted and resets to `All` on reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Every task.
    #[default]
    All,
    /// Tasks with `completed == false`.
    Active,
    /// Tasks with `completed == true`.
    Completed,
}

impl Filter {
    /// Returns whether `task` satisfies this filter.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

/// Aggregate view derived arithmetically from the collection.
///
/// `active + completed == total` holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}
