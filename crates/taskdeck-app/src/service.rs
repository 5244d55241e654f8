//! Task/tag domain service mediating all remote-store access.
//!
//! Every public operation is fails-soft: it returns a `None`/`false`/empty
//! sentinel instead of propagating an error. The typed failure reason is kept
//! in [`TaskService::last_error`] for logging and tests.

use anyhow::Error;
use taskdeck_core::{DueDateError, Tag, Task, TaskId, due, sort_by_priority};
use thiserror::Error as ThisError;
use tracing::warn;

use crate::display::{self, EditFields};
use crate::store::{
    DescriptionPatch, DuePatch, RemoteStore, TagDraft, TagPatch, TaskDraft, TaskPatch,
};
use crate::tag_index::TagIndex;

/// Typed failure reason recorded by fails-soft operations.
#[derive(Debug, ThisError)]
pub enum ServiceError {
    /// Task name was empty after trimming.
    #[error("task name must not be empty")]
    EmptyName,
    /// Due-date text failed validation.
    #[error(transparent)]
    InvalidDueDate(#[from] DueDateError),
    /// Tag name collides with an already-loaded tag.
    #[error("tag '{0}' already exists")]
    DuplicateTag(String),
    /// Task id was not found among the loaded lists.
    #[error("task {0} not found")]
    MissingTask(TaskId),
    /// Backing store returned an error.
    #[error("store error: {0}")]
    Store(#[source] Error),
}

/// Fields accepted when creating a task.
#[derive(Debug, Clone, Default)]
pub struct CreateTaskInput {
    /// Task name; trimmed and required non-empty.
    pub name: String,
    /// Optional description body.
    pub description: Option<String>,
    /// User-entered due text (`YYYY-MM-DD-HH:MM` or `YYYY-MM-DD`).
    pub due_date: Option<String>,
    /// Tag names to resolve-or-create and link.
    pub tags: Vec<String>,
}

/// Fields accepted when updating a task.
///
/// `description` and `due_date` follow replace semantics: omission clears.
/// `tags` always replaces the full association set; an empty list unlinks
/// everything.
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskInput {
    /// New name; `None` leaves the stored name unchanged.
    pub name: Option<String>,
    /// New description; `None` clears it.
    pub description: Option<String>,
    /// New due text; blank or `None` clears the due date.
    pub due_date: Option<String>,
    /// Replacement tag names.
    pub tags: Vec<String>,
}

/// Domain service owning the loaded task/tag state and the tag index.
///
/// Single-caller, non-reentrant; every operation runs its blocking store
/// round-trips to completion before returning.
pub struct TaskService<S> {
    store: S,
    pending: Vec<Task>,
    completed: Vec<Task>,
    tags: Vec<Tag>,
    index: TagIndex,
    last_error: Option<ServiceError>,
}

impl<S> TaskService<S> {
    /// Construct a service with empty state; call
    /// [`load_all_tasks`](Self::load_all_tasks) before querying.
    pub fn new(store: S) -> Self
    where
        S: RemoteStore,
    {
        Self {
            store,
            pending: Vec::new(),
            completed: Vec::new(),
            tags: Vec::new(),
            index: TagIndex::default(),
            last_error: None,
        }
    }

    /// Pending tasks in priority order, as of the last successful load.
    #[must_use]
    pub fn pending_tasks(&self) -> &[Task] {
        &self.pending
    }

    /// Completed tasks in priority order, as of the last successful load.
    #[must_use]
    pub fn completed_tasks(&self) -> &[Task] {
        &self.completed
    }

    /// All loaded tags.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Typed reason for the most recent failed operation, if any.
    #[must_use]
    pub const fn last_error(&self) -> Option<&ServiceError> {
        self.last_error.as_ref()
    }

    /// Linear search over the loaded pending+completed lists.
    #[must_use]
    pub fn task_by_id(&self, id: TaskId) -> Option<&Task> {
        self.pending
            .iter()
            .chain(self.completed.iter())
            .find(|task| task.id == id)
    }

    /// Tags currently linked to `id`, per the index.
    #[must_use]
    pub fn tags_for_task(&self, id: TaskId) -> &[Tag] {
        self.index.get(id)
    }

    /// Number of loaded tasks carrying `tag`.
    #[must_use]
    pub fn count_tasks_with_tag(&self, tag: &Tag) -> usize {
        self.index.count_tasks_with(tag.id)
    }

    /// Number of completed tasks carrying `tag`.
    #[must_use]
    pub fn count_completed_tasks_with_tag(&self, tag: &Tag) -> usize {
        self.completed
            .iter()
            .filter(|task| self.index.contains(task.id, tag.id))
            .count()
    }

    /// One-line list rendering for a task.
    #[must_use]
    pub fn task_line(&self, task: &Task) -> String {
        display::task_line(task)
    }

    /// Multi-line detail rendering including the task's tag list.
    #[must_use]
    pub fn task_details(&self, task: &Task) -> String {
        display::task_details(task, self.index.get(task.id))
    }

    /// Convert a task back into editable form fields.
    #[must_use]
    pub fn edit_fields(&self, task: &Task) -> EditFields {
        display::edit_fields(task, self.index.get(task.id))
    }

    fn settle<T>(&mut self, result: Result<T, ServiceError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Some(value)
            }
            Err(err) => {
                warn!(error = %err, "task operation failed");
                self.last_error = Some(err);
                None
            }
        }
    }
}

impl<S: RemoteStore> TaskService<S> {
    fn store_error(err: S::Error) -> ServiceError {
        ServiceError::Store(err.into())
    }

    /// Fetch all tasks and tags, rebuild the tag index, partition into
    /// pending/completed, and sort each partition by priority.
    ///
    /// Returns `false` on any underlying failure; already-loaded state may be
    /// partially replaced in that case.
    pub fn load_all_tasks(&mut self) -> bool {
        let result = self.try_load_all();
        self.settle(result).is_some()
    }

    /// Create a task, then resolve-or-create and link the given tag names.
    ///
    /// Returns `None` when the name is empty, the due text is invalid
    /// (checked before any store call), or the insert fails.
    pub fn create_task(&mut self, input: CreateTaskInput) -> Option<Task> {
        let result = self.try_create_task(input);
        self.settle(result)
    }

    /// Update a task's fields and fully replace its tag associations.
    pub fn update_task(&mut self, id: TaskId, input: UpdateTaskInput) -> Option<Task> {
        let result = self.try_update_task(id, input);
        self.settle(result)
    }

    /// Delete a task; its index entry is dropped on success.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let result = self.try_delete_task(id);
        self.settle(result).unwrap_or(false)
    }

    /// Flip the completion flag of a loaded task and persist it.
    pub fn toggle_completion(&mut self, id: TaskId) -> Option<Task> {
        let result = self.try_toggle_completion(id);
        self.settle(result)
    }

    /// Server-side substring search on tag names joined to tasks.
    ///
    /// Matches are returned unsorted; callers apply priority ordering when
    /// they need it.
    pub fn search_by_tag_name(&mut self, term: &str) -> Vec<Task> {
        let pattern = format!("%{term}%");
        let result = self
            .store
            .search_tasks_by_tag_pattern(&pattern)
            .map_err(Self::store_error);
        self.settle(result).unwrap_or_default()
    }

    /// Create a tag; fails without a store call when the name is taken.
    pub fn create_tag(&mut self, name: &str, description: Option<String>) -> Option<Tag> {
        let result = self.try_create_tag(name, description);
        self.settle(result)
    }

    /// Rename/redescribe a tag; fails without a store call when the new name
    /// collides with a different tag.
    pub fn update_tag(&mut self, tag: &Tag, name: &str, description: Option<String>) -> Option<Tag> {
        let result = self.try_update_tag(tag, name, description);
        self.settle(result)
    }

    /// Delete a tag and strip it from every task's membership.
    pub fn delete_tag(&mut self, tag: &Tag) -> bool {
        let result = self.try_delete_tag(tag);
        self.settle(result).unwrap_or(false)
    }

    fn try_load_all(&mut self) -> Result<(), ServiceError> {
        let tasks = self.store.list_tasks().map_err(Self::store_error)?;

        // Index rebuild strictly precedes partition/sort.
        self.index
            .rebuild(&self.store, &tasks)
            .map_err(Self::store_error)?;

        self.tags = self.store.list_tags().map_err(Self::store_error)?;

        let (completed, pending): (Vec<Task>, Vec<Task>) =
            tasks.into_iter().partition(|task| task.is_completed);
        self.pending = pending;
        self.completed = completed;
        sort_by_priority(&mut self.pending);
        sort_by_priority(&mut self.completed);
        Ok(())
    }

    fn try_create_task(&mut self, input: CreateTaskInput) -> Result<Task, ServiceError> {
        let CreateTaskInput {
            name,
            description,
            due_date,
            tags,
        } = input;

        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::EmptyName);
        }
        let due_date = normalize_due_input(due_date.as_deref())?;

        let draft = TaskDraft {
            name: name.to_owned(),
            description,
            due_date,
            is_completed: false,
        };
        let task = self.store.insert_task(&draft).map_err(Self::store_error)?;

        if !tags.is_empty() {
            self.link_named_tags(task.id, &tags);
        }
        Ok(task)
    }

    fn try_update_task(&mut self, id: TaskId, input: UpdateTaskInput) -> Result<Task, ServiceError> {
        let UpdateTaskInput {
            name,
            description,
            due_date,
            tags,
        } = input;

        let name = match name {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(ServiceError::EmptyName);
                }
                Some(trimmed.to_owned())
            }
            None => None,
        };
        let due_patch = match normalize_due_input(due_date.as_deref())? {
            Some(canonical) => DuePatch::Set { due_date: canonical },
            None => DuePatch::Clear,
        };
        let description_patch = match description {
            Some(description) => DescriptionPatch::Set { description },
            None => DescriptionPatch::Clear,
        };

        let patch = TaskPatch {
            name,
            description: Some(description_patch),
            due_date: Some(due_patch),
            is_completed: None,
        };
        let task = self
            .store
            .update_task(id, &patch)
            .map_err(Self::store_error)?;

        // The tag set is fully replaced: unlink everything, then re-link.
        self.store
            .unlink_all_for_task(id)
            .map_err(Self::store_error)?;
        if tags.is_empty() {
            self.index.clear_for_task(id);
        } else {
            self.link_named_tags(id, &tags);
        }
        Ok(task)
    }

    fn try_delete_task(&mut self, id: TaskId) -> Result<bool, ServiceError> {
        let deleted = self.store.delete_task(id).map_err(Self::store_error)?;
        if deleted {
            self.index.remove_entry(id);
        }
        Ok(deleted)
    }

    fn try_toggle_completion(&mut self, id: TaskId) -> Result<Task, ServiceError> {
        let current = self
            .task_by_id(id)
            .ok_or(ServiceError::MissingTask(id))?
            .is_completed;
        let patch = TaskPatch {
            is_completed: Some(!current),
            ..TaskPatch::default()
        };
        self.store.update_task(id, &patch).map_err(Self::store_error)
    }

    fn try_create_tag(&mut self, name: &str, description: Option<String>) -> Result<Tag, ServiceError> {
        if self.tags.iter().any(|tag| tag.name == name) {
            return Err(ServiceError::DuplicateTag(name.to_owned()));
        }

        let draft = TagDraft {
            name: name.to_owned(),
            description,
        };
        let tag = self.store.insert_tag(&draft).map_err(Self::store_error)?;
        self.reload_after_tag_mutation();
        Ok(tag)
    }

    fn try_update_tag(
        &mut self,
        tag: &Tag,
        name: &str,
        description: Option<String>,
    ) -> Result<Tag, ServiceError> {
        if self.tags.iter().any(|t| t.name == name && t.id != tag.id) {
            return Err(ServiceError::DuplicateTag(name.to_owned()));
        }

        let patch = TagPatch {
            name: name.to_owned(),
            description,
        };
        let updated = self
            .store
            .update_tag(tag.id, &patch)
            .map_err(Self::store_error)?;
        self.reload_after_tag_mutation();
        Ok(updated)
    }

    fn try_delete_tag(&mut self, tag: &Tag) -> Result<bool, ServiceError> {
        let deleted = self.store.delete_tag(tag.id).map_err(Self::store_error)?;
        if deleted {
            self.reload_after_tag_mutation();
            // The reload already rebuilt the index from the store; stripping
            // again covers a join table that still held stale rows.
            self.index.remove_tag_everywhere(tag.id);
        }
        Ok(deleted)
    }

    /// Resolve each name to an existing tag or create it, then link it to the
    /// task and refresh the task's index entry from the store.
    ///
    /// Best-effort: a failed per-tag call is logged and skipped, and a failed
    /// refresh leaves the entry stale until the next full reload.
    fn link_named_tags(&mut self, task: TaskId, names: &[String]) {
        for raw in names {
            let name = raw.trim();
            if name.is_empty() {
                continue;
            }

            let tag = match self.store.find_tag_by_name(name) {
                Ok(Some(tag)) => tag,
                Ok(None) => match self.store.insert_tag(&TagDraft {
                    name: name.to_owned(),
                    description: None,
                }) {
                    Ok(tag) => tag,
                    Err(err) => {
                        let err: Error = err.into();
                        warn!(tag = name, error = %err, "failed to create tag, skipping");
                        continue;
                    }
                },
                Err(err) => {
                    let err: Error = err.into();
                    warn!(tag = name, error = %err, "tag lookup failed, skipping");
                    continue;
                }
            };

            if let Err(err) = self.store.link_task_tag(task, tag.id) {
                let err: Error = err.into();
                warn!(task = %task, tag = %tag.id, error = %err, "failed to link tag");
            }
        }

        match self.store.list_tags_for_task(task) {
            Ok(tags) => self.index.replace_for_task(task, tags),
            Err(err) => {
                let err: Error = err.into();
                warn!(task = %task, error = %err, "index refresh failed, entry left stale");
            }
        }
    }

    /// Tag mutations trade efficiency for correctness: a full synchronous
    /// reload instead of incremental consistency. Its failure is logged but
    /// does not undo the already-persisted mutation.
    fn reload_after_tag_mutation(&mut self) {
        if let Err(err) = self.try_load_all() {
            warn!(error = %err, "reload after tag mutation failed");
        }
    }
}

fn normalize_due_input(due_date: Option<&str>) -> Result<Option<String>, ServiceError> {
    match due_date.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(Some(due::to_canonical(text)?)),
        _ => Ok(None),
    }
}
