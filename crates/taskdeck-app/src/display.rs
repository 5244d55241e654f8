//! Text rendering shared by list views, detail panes, and edit forms.

use std::fmt::Write as _;

use taskdeck_core::{Tag, Task, due};

/// One-line list rendering.
///
/// Completed tasks show the bare name; pending tasks append the
/// remaining/overdue text in parentheses.
#[must_use]
pub fn task_line(task: &Task) -> String {
    if task.is_completed {
        task.display_name().to_owned()
    } else {
        format!(
            "{} ({})",
            task.display_name(),
            due::time_left(task.due_date.as_deref())
        )
    }
}

/// Multi-line detail rendering of a task and its tag list.
#[must_use]
pub fn task_details(task: &Task, tags: &[Tag]) -> String {
    let mut out = String::from("Task information:\n\n");
    let _ = writeln!(out, "  name: {}", task.name);

    if let Some(created_at) = &task.created_at {
        let _ = writeln!(out, "  created_at: {}", due::display(created_at));
    }
    if let Some(due_date) = &task.due_date {
        let _ = writeln!(out, "  due_date: {}", due::display(due_date));
    }
    if let Some(description) = &task.description {
        let _ = writeln!(out, "  description: {description}");
    }

    if tags.is_empty() {
        out.push_str("\nTags: No tags\n");
    } else {
        out.push_str("\nTags:\n");
        for tag in tags {
            let _ = writeln!(out, "  - {}", tag.name);
        }
    }
    out
}

/// Editable form fields derived from a loaded task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditFields {
    /// Current task name.
    pub name: String,
    /// Description body, empty when unset.
    pub description: String,
    /// Due date in the `YYYY-MM-DD-HH:MM` edit shape, empty when unset.
    pub due_date: String,
    /// Tag names joined with ", ".
    pub tags: String,
}

/// Convert a task and its tag list back into editable text form.
#[must_use]
pub fn edit_fields(task: &Task, tags: &[Tag]) -> EditFields {
    EditFields {
        name: task.name.clone(),
        description: task.description.clone().unwrap_or_default(),
        due_date: task.due_date.as_deref().map(due::display).unwrap_or_default(),
        tags: tags.iter().map(|tag| tag.name.as_str()).collect::<Vec<_>>().join(", "),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use taskdeck_core::{TagId, TaskId};

    fn task(name: &str, due_date: Option<&str>, is_completed: bool) -> Task {
        Task {
            id: TaskId(1),
            name: name.into(),
            description: None,
            due_date: due_date.map(str::to_owned),
            is_completed,
            created_at: Some("2025-01-01T09:30:00+09:00".into()),
        }
    }

    fn tag(id: i64, name: &str) -> Tag {
        Tag {
            id: TagId(id),
            name: name.into(),
            description: None,
        }
    }

    #[test]
    fn completed_tasks_render_name_only() {
        assert_eq!(task_line(&task("ship it", None, true)), "ship it");
    }

    #[test]
    fn pending_tasks_append_deadline_text() {
        assert_eq!(task_line(&task("ship it", None, false)), "ship it (No deadline)");
        let overdue = task("late", Some("2000-01-01T00:00:00+09:00"), false);
        assert!(task_line(&overdue).starts_with("late (Overdue by "));
    }

    #[test]
    fn details_localize_timestamps_and_list_tags() {
        let mut subject = task("report", Some("2025-03-02T18:30:00+09:00"), false);
        subject.description = Some("quarterly numbers".into());
        let rendered = task_details(&subject, &[tag(1, "work"), tag(2, "urgent")]);

        assert!(rendered.contains("  name: report\n"));
        assert!(rendered.contains("  created_at: 2025-01-01-09:30\n"));
        assert!(rendered.contains("  due_date: 2025-03-02-18:30\n"));
        assert!(rendered.contains("  description: quarterly numbers\n"));
        assert!(rendered.contains("\nTags:\n  - work\n  - urgent\n"));
    }

    #[test]
    fn details_note_the_absence_of_tags() {
        let rendered = task_details(&task("bare", None, false), &[]);
        assert!(rendered.contains("Tags: No tags"));
        assert!(!rendered.contains("due_date"));
    }

    #[test]
    fn edit_fields_rerender_the_due_date_and_join_tags() {
        let subject = task("report", Some("2025-03-02T18:30:00+09:00"), false);
        let fields = edit_fields(&subject, &[tag(1, "work"), tag(2, "urgent")]);
        assert_eq!(
            fields,
            EditFields {
                name: "report".into(),
                description: String::new(),
                due_date: "2025-03-02-18:30".into(),
                tags: "work, urgent".into(),
            }
        );
    }

    #[test]
    fn edit_fields_for_a_bare_task_are_empty_strings() {
        let fields = edit_fields(&task("bare", None, false), &[]);
        assert!(fields.description.is_empty());
        assert!(fields.due_date.is_empty());
        assert!(fields.tags.is_empty());
    }
}
