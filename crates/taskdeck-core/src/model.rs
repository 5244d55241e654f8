use serde::{Deserialize, Serialize};

use crate::id::{TagId, TaskId};

/// A task as loaded from the remote store.
///
/// Timestamps (`due_date`, `created_at`) are carried as canonical RFC 3339
/// strings anchored to UTC+9; see [`crate::due`] for parsing and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identity, immutable after creation.
    pub id: TaskId,
    /// Required display name; never persisted empty.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Optional canonical due timestamp.
    pub due_date: Option<String>,
    /// Completion flag.
    pub is_completed: bool,
    /// Store-assigned creation timestamp.
    pub created_at: Option<String>,
}

impl Task {
    /// Name used for rendering; empty names fall back to a placeholder.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { "Untitled" } else { &self.name }
    }
}

/// A tag as loaded from the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Store-assigned identity.
    pub id: TagId,
    /// Unique (per user) tag name, matched case-sensitively.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
}
