//! Application layer logic for taskdeck.
//!
//! This crate provides the remote-store abstraction, the tag membership
//! index, the task/tag domain service, and display helpers shared across
//! frontends.

pub mod display;
pub mod service;
pub mod store;
pub mod tag_index;

// Re-exports for convenience
pub use display::{EditFields, edit_fields, task_details, task_line};
pub use service::{CreateTaskInput, ServiceError, TaskService, UpdateTaskInput};
pub use store::{DescriptionPatch, DuePatch, RemoteStore, TagDraft, TagPatch, TaskDraft, TaskPatch};
pub use tag_index::TagIndex;
