//! Domain types and pure helpers for taskdeck.

/// Due-date parsing, rendering, and remaining-time text.
pub mod due;
/// Identifier types.
pub mod id;
/// Task and tag value objects.
pub mod model;
/// Deadline-driven priority ordering.
pub mod priority;

pub use due::DueDateError;
pub use id::{TagId, TaskId};
pub use model::{Tag, Task};
pub use priority::sort_by_priority;
