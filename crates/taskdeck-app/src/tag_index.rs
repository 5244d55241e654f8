//! In-memory task-id → tag-list index kept consistent with the store's
//! join table.

use std::collections::HashMap;

use taskdeck_core::{Tag, TagId, Task, TaskId};

use crate::store::RemoteStore;

/// Per-task tag membership, owned by the domain service.
///
/// Rebuilt in full on every reload and patched incrementally after single-task
/// tag mutations. Allowed to be stale between a failed remote call and the
/// next full reload.
#[derive(Debug, Default, Clone)]
pub struct TagIndex {
    entries: HashMap<TaskId, Vec<Tag>>,
}

impl TagIndex {
    /// Replace the whole index from the store's join table for `tasks`.
    ///
    /// # Errors
    /// Propagates store-specific read failures; the index is left empty.
    pub fn rebuild<S>(&mut self, store: &S, tasks: &[Task]) -> Result<(), S::Error>
    where
        S: RemoteStore,
    {
        self.entries.clear();
        for task in tasks {
            let tags = store.list_tags_for_task(task.id)?;
            self.entries.insert(task.id, tags);
        }
        Ok(())
    }

    /// Overwrite the entry for one task.
    pub fn replace_for_task(&mut self, task: TaskId, tags: Vec<Tag>) {
        self.entries.insert(task, tags);
    }

    /// Set the entry for one task to empty.
    pub fn clear_for_task(&mut self, task: TaskId) {
        self.entries.insert(task, Vec::new());
    }

    /// Drop the entry entirely (task deleted).
    pub fn remove_entry(&mut self, task: TaskId) {
        self.entries.remove(&task);
    }

    /// Strip one tag id from every entry without a store round-trip.
    pub fn remove_tag_everywhere(&mut self, tag: TagId) {
        for tags in self.entries.values_mut() {
            tags.retain(|t| t.id != tag);
        }
    }

    /// Tags linked to `task`, empty when unknown.
    #[must_use]
    pub fn get(&self, task: TaskId) -> &[Tag] {
        self.entries.get(&task).map_or(&[], Vec::as_slice)
    }

    /// True when `task` currently carries `tag`.
    #[must_use]
    pub fn contains(&self, task: TaskId, tag: TagId) -> bool {
        self.get(task).iter().any(|t| t.id == tag)
    }

    /// Number of indexed tasks carrying `tag`.
    #[must_use]
    pub fn count_tasks_with(&self, tag: TagId) -> usize {
        self.entries
            .values()
            .filter(|tags| tags.iter().any(|t| t.id == tag))
            .count()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;

    fn tag(id: i64, name: &str) -> Tag {
        Tag {
            id: TagId(id),
            name: name.into(),
            description: None,
        }
    }

    #[test]
    fn unknown_task_yields_empty_slice() {
        let index = TagIndex::default();
        assert!(index.get(TaskId(7)).is_empty());
        assert!(!index.contains(TaskId(7), TagId(1)));
    }

    #[test]
    fn replace_and_clear_roundtrip() {
        let mut index = TagIndex::default();
        index.replace_for_task(TaskId(1), vec![tag(10, "work"), tag(11, "urgent")]);
        assert_eq!(index.get(TaskId(1)).len(), 2);
        assert!(index.contains(TaskId(1), TagId(11)));

        index.clear_for_task(TaskId(1));
        assert!(index.get(TaskId(1)).is_empty());
        assert_eq!(index.count_tasks_with(TagId(10)), 0);
    }

    #[test]
    fn remove_tag_everywhere_keeps_other_memberships() {
        let mut index = TagIndex::default();
        index.replace_for_task(TaskId(1), vec![tag(10, "work"), tag(11, "urgent")]);
        index.replace_for_task(TaskId(2), vec![tag(10, "work")]);

        index.remove_tag_everywhere(TagId(10));

        assert_eq!(index.get(TaskId(1)), &[tag(11, "urgent")][..]);
        assert!(index.get(TaskId(2)).is_empty());
        assert_eq!(index.count_tasks_with(TagId(11)), 1);
    }

    #[test]
    fn count_spans_all_indexed_tasks() {
        let mut index = TagIndex::default();
        index.replace_for_task(TaskId(1), vec![tag(10, "work")]);
        index.replace_for_task(TaskId(2), vec![tag(10, "work")]);
        index.replace_for_task(TaskId(3), vec![tag(11, "home")]);
        assert_eq!(index.count_tasks_with(TagId(10)), 2);

        index.remove_entry(TaskId(1));
        assert_eq!(index.count_tasks_with(TagId(10)), 1);
    }
}
