//! Remote-store abstraction consumed by [`crate::service::TaskService`].

use anyhow::Error;
use serde::Serialize;
use taskdeck_core::{Tag, TagId, Task, TaskId};

/// Insert payload for a new task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskDraft {
    /// Trimmed, non-empty task name.
    pub name: String,
    /// Optional description body.
    pub description: Option<String>,
    /// Canonical due timestamp, already normalized.
    pub due_date: Option<String>,
    /// Initial completion flag.
    pub is_completed: bool,
}

/// Patch for the description column.
#[derive(Debug, Clone)]
pub enum DescriptionPatch {
    /// Overwrite with a new body.
    Set {
        /// Description body.
        description: String,
    },
    /// Clear the description.
    Clear,
}

/// Patch for the due-date column.
#[derive(Debug, Clone)]
pub enum DuePatch {
    /// Overwrite with a canonical timestamp.
    Set {
        /// Canonical RFC 3339 due timestamp.
        due_date: String,
    },
    /// Clear the due date.
    Clear,
}

/// Partial task update; absent fields are left untouched by the store.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    /// Overwrite the task name.
    pub name: Option<String>,
    /// Patch applied to the description.
    pub description: Option<DescriptionPatch>,
    /// Patch applied to the due date.
    pub due_date: Option<DuePatch>,
    /// Overwrite the completion flag.
    pub is_completed: Option<bool>,
}

impl TaskPatch {
    /// Returns true when the patch would not change any column.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.is_completed.is_none()
    }
}

/// Insert payload for a new tag.
#[derive(Debug, Clone, Serialize)]
pub struct TagDraft {
    /// Tag name, unique per user.
    pub name: String,
    /// Optional description body.
    pub description: Option<String>,
}

/// Full tag update; rename always rewrites both columns.
#[derive(Debug, Clone, Serialize)]
pub struct TagPatch {
    /// New tag name.
    pub name: String,
    /// New description (`None` clears).
    pub description: Option<String>,
}

/// CRUD surface expected of the remote store.
///
/// Every call may fail wholesale (network, auth, server error); the domain
/// service treats any such failure as equivalent to "no result".
pub trait RemoteStore {
    /// Error type bubbled up from the backing store.
    type Error: Into<Error>;

    /// Fetch every task owned by the current user.
    ///
    /// # Errors
    /// Returns a store-specific error when the listing fails.
    fn list_tasks(&self) -> Result<Vec<Task>, Self::Error>;

    /// Persist a new task and return the store-assigned record.
    ///
    /// # Errors
    /// Returns a store-specific error when the insert fails or yields no record.
    fn insert_task(&self, draft: &TaskDraft) -> Result<Task, Self::Error>;

    /// Apply a partial update and return the canonical updated record.
    ///
    /// # Errors
    /// Returns a store-specific error when the update fails or yields no record.
    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, Self::Error>;

    /// Delete a task. `Ok(false)` means no matching row existed.
    ///
    /// # Errors
    /// Returns a store-specific error when the delete fails.
    fn delete_task(&self, id: TaskId) -> Result<bool, Self::Error>;

    /// Fetch every tag owned by the current user.
    ///
    /// # Errors
    /// Returns a store-specific error when the listing fails.
    fn list_tags(&self) -> Result<Vec<Tag>, Self::Error>;

    /// Fetch the tags currently linked to one task.
    ///
    /// # Errors
    /// Returns a store-specific error when the lookup fails.
    fn list_tags_for_task(&self, id: TaskId) -> Result<Vec<Tag>, Self::Error>;

    /// Exact-name tag lookup.
    ///
    /// # Errors
    /// Returns a store-specific error when the lookup fails.
    fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>, Self::Error>;

    /// Persist a new tag and return the store-assigned record.
    ///
    /// # Errors
    /// Returns a store-specific error when the insert fails or yields no record.
    fn insert_tag(&self, draft: &TagDraft) -> Result<Tag, Self::Error>;

    /// Rename/redescribe a tag and return the canonical updated record.
    ///
    /// # Errors
    /// Returns a store-specific error when the update fails or yields no record.
    fn update_tag(&self, id: TagId, patch: &TagPatch) -> Result<Tag, Self::Error>;

    /// Delete a tag. `Ok(false)` means no matching row existed.
    ///
    /// # Errors
    /// Returns a store-specific error when the delete fails.
    fn delete_tag(&self, id: TagId) -> Result<bool, Self::Error>;

    /// Create one task–tag join row.
    ///
    /// # Errors
    /// Returns a store-specific error when the insert fails.
    fn link_task_tag(&self, task: TaskId, tag: TagId) -> Result<(), Self::Error>;

    /// Remove every join row for one task.
    ///
    /// # Errors
    /// Returns a store-specific error when the delete fails.
    fn unlink_all_for_task(&self, task: TaskId) -> Result<(), Self::Error>;

    /// Server-side case-insensitive tag-name match joined to tasks.
    ///
    /// `pattern` uses SQL-style `%` wildcards.
    ///
    /// # Errors
    /// Returns a store-specific error when the search fails.
    fn search_tasks_by_tag_pattern(&self, pattern: &str) -> Result<Vec<Task>, Self::Error>;
}
