//! Typed wire rows for the PostgREST tables and the task–tag join view.
//!
//! Rows are strict: a missing or unknown column is a decode error, never a
//! silent default.

use serde::Deserialize;
use taskdeck_core::{Tag, TagId, Task, TaskId};

/// Row of `task_table`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TaskRow {
    pub id: i64,
    #[allow(dead_code)]
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub is_completed: bool,
    pub created_at: Option<String>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: TaskId(row.id),
            name: row.name,
            description: row.description,
            due_date: row.due_date,
            is_completed: row.is_completed,
            created_at: row.created_at,
        }
    }
}

/// Row of `tag_table`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TagRow {
    pub id: i64,
    #[allow(dead_code)]
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Self {
            id: TagId(row.id),
            name: row.name,
            description: row.description,
        }
    }
}

/// Row of the denormalized `task_tag_view`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TaskTagRow {
    pub task_id: i64,
    #[allow(dead_code)]
    pub task_user_id: String,
    pub task_name: String,
    pub task_description: Option<String>,
    pub task_due_date: Option<String>,
    pub task_is_completed: bool,
    pub task_created_at: Option<String>,
    pub tag_id: i64,
    #[allow(dead_code)]
    pub tag_user_id: String,
    pub tag_name: String,
}

impl TaskTagRow {
    /// Project the task half of the view row.
    pub(crate) fn into_task(self) -> Task {
        Task {
            id: TaskId(self.task_id),
            name: self.task_name,
            description: self.task_description,
            due_date: self.task_due_date,
            is_completed: self.task_is_completed,
            created_at: self.task_created_at,
        }
    }

    /// Project the tag half of the view row.
    pub(crate) fn into_tag(self) -> Tag {
        Tag {
            id: TagId(self.tag_id),
            name: self.tag_name,
            description: None,
        }
    }
}
