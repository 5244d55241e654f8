//! Deadline-driven ordering used by the pending and completed list views.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::model::Task;

/// Priority bucket without a usable deadline; always sorts last.
const BUCKET_NONE: (u8, i64) = (3, 0);

/// Stable sort by deadline priority.
///
/// Three ascending buckets: upcoming deadlines first (soonest first), then
/// overdue tasks (most recently passed first), then tasks without a due date
/// or with an unparseable one.
pub fn sort_by_priority(tasks: &mut [Task]) {
    sort_by_priority_at(tasks, OffsetDateTime::now_utc());
}

fn sort_by_priority_at(tasks: &mut [Task], now: OffsetDateTime) {
    tasks.sort_by_key(|task| sort_key(task, now));
}

fn sort_key(task: &Task, now: OffsetDateTime) -> (u8, i64) {
    let Some(due_date) = task.due_date.as_deref() else {
        return BUCKET_NONE;
    };
    let Ok(due) = OffsetDateTime::parse(due_date, &Rfc3339) else {
        return BUCKET_NONE;
    };
    let ts = due.unix_timestamp();
    if due < now { (2, -ts) } else { (1, ts) }
}
