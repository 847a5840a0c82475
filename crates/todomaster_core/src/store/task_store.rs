//! Task store: every state transition of the task list.
//!
//! # Responsibility
//! - Apply add/toggle/delete/clear transitions over the ordered collection.
//! - Write the full collection to the snapshot backend after each mutation.
//! - Notify the registered observer whenever the derived view changes.
//!
//! # Invariants
//! - `id` values are unique per session and strictly increasing.
//! - A mutation is applied in memory before the snapshot write; a write
//!   failure is surfaced but never rolls the mutation back.
//! - The filter is transient and never written to the backend.

use crate::model::task::{Counts, Filter, Task, TaskId};
use crate::persist::{decode_snapshot, encode_snapshot, PersistResult, SnapshotStore};
use log::{debug, error, warn};

/// Mutation descriptor delivered to the on-change observer.
///
/// The presentation layer reacts to these instead of the store re-rendering
/// implicitly; the store stays ignorant of what a repaint costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    TaskAdded(TaskId),
    TaskToggled(TaskId),
    TaskDeleted(TaskId),
    /// Carries how many completed tasks were removed.
    CompletedCleared(usize),
    FilterChanged(Filter),
}

type ChangeObserver = Box<dyn FnMut(&ChangeEvent)>;

/// Owner of the task collection and its derived views.
///
/// Single-threaded by design: one externally-triggered operation runs to
/// completion before the next, so no locking discipline exists here.
pub struct TaskStore<S: SnapshotStore> {
    tasks: Vec<Task>,
    filter: Filter,
    title_draft: String,
    description_draft: String,
    next_id: TaskId,
    backend: S,
    on_change: Option<ChangeObserver>,
}

impl<S: SnapshotStore> std::fmt::Debug for TaskStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks)
            .field("filter", &self.filter)
            .field("title_draft", &self.title_draft)
            .field("description_draft", &self.description_draft)
            .field("next_id", &self.next_id)
            .field("on_change", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: SnapshotStore> TaskStore<S> {
    /// Restores a store from the backend's last snapshot, failing fast.
    ///
    /// An absent snapshot yields an empty collection. A malformed one is
    /// surfaced as `PersistError::Corrupt`; callers that prefer recovery over
    /// diagnosis should use [`TaskStore::open_or_empty`].
    pub fn open(backend: S) -> PersistResult<Self> {
        let tasks = match backend.load()? {
            Some(raw) => decode_snapshot(&raw)?,
            None => Vec::new(),
        };
        debug!(
            "event=store_open module=store status=ok restored={}",
            tasks.len()
        );
        Ok(Self::from_parts(backend, tasks))
    }

    /// Restores a store, falling back to an empty collection on corruption.
    ///
    /// This is the recommended startup path: a snapshot that cannot be
    /// decoded is logged and abandoned rather than taking the session down.
    /// Backend transport failures still propagate, since nothing can be
    /// loaded or saved through a broken connection.
    pub fn open_or_empty(backend: S) -> PersistResult<Self> {
        let tasks = match backend.load()? {
            None => Vec::new(),
            Some(raw) => match decode_snapshot(&raw) {
                Ok(tasks) => tasks,
                Err(err) => {
                    error!(
                        "event=store_open module=store status=corrupt_snapshot \
                         action=reset_to_empty error={err}"
                    );
                    Vec::new()
                }
            },
        };
        debug!(
            "event=store_open module=store status=ok restored={}",
            tasks.len()
        );
        Ok(Self::from_parts(backend, tasks))
    }

    fn from_parts(backend: S, tasks: Vec<Task>) -> Self {
        // Seed past the highest restored id so restored and new tasks can
        // never collide within the session.
        let next_id = tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1;
        Self {
            tasks,
            filter: Filter::default(),
            title_draft: String::new(),
            description_draft: String::new(),
            next_id,
            backend,
            on_change: None,
        }
    }

    /// Registers the observer called after every view-affecting change.
    pub fn set_on_change(&mut self, observer: impl FnMut(&ChangeEvent) + 'static) {
        self.on_change = Some(Box::new(observer));
    }

    /// Replaces the pending title draft.
    pub fn set_title_draft(&mut self, text: impl Into<String>) {
        self.title_draft = text.into();
    }

    /// Replaces the pending description draft.
    pub fn set_description_draft(&mut self, text: impl Into<String>) {
        self.description_draft = text.into();
    }

    pub fn title_draft(&self) -> &str {
        &self.title_draft
    }

    pub fn description_draft(&self) -> &str {
        &self.description_draft
    }

    /// Appends a task built from the pending drafts.
    ///
    /// A whitespace-only title is a silent guard, not a failure: nothing is
    /// appended, the drafts are kept, and `Ok(None)` is returned. On success
    /// both drafts are cleared and the new task's id is returned.
    ///
    /// # Errors
    /// - Snapshot write failure; the task is already in the collection.
    pub fn add_task(&mut self) -> PersistResult<Option<TaskId>> {
        // Task::new trims both drafts itself, so the only possible failure
        // here is an empty title, which is the silent guard.
        let Ok(task) = Task::new(self.next_id, &self.title_draft, &self.description_draft) else {
            debug!("event=task_add module=store status=skipped reason=empty_title");
            return Ok(None);
        };

        let id = task.id;
        self.next_id += 1;
        self.tasks.push(task);
        self.title_draft.clear();
        self.description_draft.clear();
        debug!("event=task_add module=store status=ok id={id}");

        self.commit(ChangeEvent::TaskAdded(id)).map(|()| Some(id))
    }

    /// Removes the task with the given id.
    ///
    /// A missing id is a no-op returning `Ok(false)`; this tolerates a stale
    /// presentation reference racing an earlier delete.
    pub fn delete_task(&mut self, id: TaskId) -> PersistResult<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            debug!("event=task_delete module=store status=skipped reason=not_found id={id}");
            return Ok(false);
        }

        debug!("event=task_delete module=store status=ok id={id}");
        self.commit(ChangeEvent::TaskDeleted(id)).map(|()| true)
    }

    /// Flips the completion flag on the task with the given id.
    ///
    /// A missing id is a no-op returning `Ok(false)`.
    pub fn toggle_complete(&mut self, id: TaskId) -> PersistResult<bool> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_toggle module=store status=skipped reason=not_found id={id}");
            return Ok(false);
        };

        task.toggle();
        debug!(
            "event=task_toggle module=store status=ok id={id} completed={}",
            task.completed
        );
        self.commit(ChangeEvent::TaskToggled(id)).map(|()| true)
    }

    /// Removes every completed task, preserving the relative order of the
    /// rest. Safe to call with zero completed tasks; that is a no-op.
    pub fn clear_completed(&mut self) -> PersistResult<usize> {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        let removed = before - self.tasks.len();
        if removed == 0 {
            debug!("event=clear_completed module=store status=skipped reason=none_completed");
            return Ok(0);
        }

        debug!("event=clear_completed module=store status=ok removed={removed}");
        self.commit(ChangeEvent::CompletedCleared(removed))
            .map(|()| removed)
    }

    /// Selects the active filter. Pure view change: no snapshot write, but
    /// the observer is notified because the visible list changed.
    pub fn set_filter(&mut self, filter: Filter) {
        if self.filter == filter {
            return;
        }
        self.filter = filter;
        self.notify(&ChangeEvent::FilterChanged(filter));
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// The tasks satisfying the active filter, in insertion order.
    ///
    /// Recomputed on demand; iterate again for a fresh view.
    pub fn visible_tasks(&self) -> impl Iterator<Item = &Task> {
        let filter = self.filter;
        self.tasks.iter().filter(move |task| filter.matches(task))
    }

    /// The full collection regardless of filter, in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Aggregate counters derived from the collection.
    pub fn counts(&self) -> Counts {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        Counts {
            total,
            active: total - completed,
            completed,
        }
    }

    /// Persists the full collection, then notifies the observer.
    ///
    /// The observer always runs: the in-memory state did change even when the
    /// durable copy now lags behind it.
    fn commit(&mut self, event: ChangeEvent) -> PersistResult<()> {
        let outcome = self.write_snapshot();
        if let Err(err) = &outcome {
            warn!(
                "event=snapshot_save module=store status=error tasks={} error={err}",
                self.tasks.len()
            );
        }
        self.notify(&event);
        outcome
    }

    fn write_snapshot(&mut self) -> PersistResult<()> {
        let raw = encode_snapshot(&self.tasks)?;
        self.backend.save(&raw)
    }

    fn notify(&mut self, event: &ChangeEvent) {
        if let Some(observer) = self.on_change.as_mut() {
            observer(event);
        }
    }
}
