//! PostgREST-backed storage implementation for taskdeck.
//!
//! Speaks the flat REST dialect exposed by PostgREST/Supabase: one route per
//! table, `column=eq.value` filters, `Prefer: return=representation` to read
//! back mutated rows.

mod error;
mod rows;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use taskdeck_app::store::{RemoteStore, TagDraft, TagPatch, TaskDraft, TaskPatch};
use taskdeck_app::{DescriptionPatch, DuePatch};
use taskdeck_core::{Tag, TagId, Task, TaskId};
use tracing::debug;
use url::Url;

pub use error::RestStoreError;

use rows::{TagRow, TaskRow, TaskTagRow};

const TASK_TABLE: &str = "task_table";
const TAG_TABLE: &str = "tag_table";
const JOIN_TABLE: &str = "task_tag_join_table";
const TASK_TAG_VIEW: &str = "task_tag_view";

/// Storage backed by a PostgREST-style HTTP API, scoped to one user.
pub struct RestStore {
    client: Client,
    base_url: Url,
    api_key: String,
    user_id: String,
}

impl RestStore {
    /// Build a store client for the given REST root (e.g. `…/rest/v1/`).
    ///
    /// # Errors
    /// Returns an error if the base URL cannot be parsed.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Result<Self, RestStoreError> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_owned()
        } else {
            format!("{base_url}/")
        };
        Ok(Self {
            client: Client::new(),
            base_url: Url::parse(&normalized)?,
            api_key: api_key.into(),
            user_id: user_id.into(),
        })
    }

    fn endpoint(&self, table: &str) -> Result<Url, RestStoreError> {
        Ok(self.base_url.join(table)?)
    }

    fn user_filter(&self) -> String {
        format!("eq.{}", self.user_id)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    fn decode_rows<T: DeserializeOwned>(response: Response, path: &str) -> Result<Vec<T>, RestStoreError> {
        let status = response.status();
        if !status.is_success() {
            return Err(RestStoreError::UnexpectedStatus {
                status: status.as_u16(),
                path: path.to_owned(),
            });
        }
        let body = response.text()?;
        serde_json::from_str(&body).map_err(|source| RestStoreError::Decode {
            path: path.to_owned(),
            source,
        })
    }

    fn expect_status(response: &Response, path: &str) -> Result<(), RestStoreError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RestStoreError::UnexpectedStatus {
                status: status.as_u16(),
                path: path.to_owned(),
            })
        }
    }

    fn get_rows<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, RestStoreError> {
        let path = url.path().to_owned();
        debug!(%url, "GET");
        let response = self.authorized(self.client.get(url)).send()?;
        Self::decode_rows(response, &path)
    }

    fn mutate_rows<T: DeserializeOwned>(&self, builder: RequestBuilder, path: &str) -> Result<Vec<T>, RestStoreError> {
        let response = self
            .authorized(builder)
            .header("Prefer", "return=representation")
            .send()?;
        Self::decode_rows(response, path)
    }

    fn first_row<T>(rows: Vec<T>, operation: &'static str) -> Result<T, RestStoreError> {
        rows.into_iter()
            .next()
            .ok_or(RestStoreError::EmptyResponse(operation))
    }
}

/// Serialize a [`TaskPatch`] into a PostgREST update body: absent fields are
/// omitted, `Clear` becomes an explicit `null`.
fn task_patch_body(patch: &TaskPatch) -> Map<String, Value> {
    let mut body = Map::new();
    if let Some(name) = &patch.name {
        body.insert("name".into(), Value::String(name.clone()));
    }
    match &patch.description {
        Some(DescriptionPatch::Set { description }) => {
            body.insert("description".into(), Value::String(description.clone()));
        }
        Some(DescriptionPatch::Clear) => {
            body.insert("description".into(), Value::Null);
        }
        None => {}
    }
    match &patch.due_date {
        Some(DuePatch::Set { due_date }) => {
            body.insert("due_date".into(), Value::String(due_date.clone()));
        }
        Some(DuePatch::Clear) => {
            body.insert("due_date".into(), Value::Null);
        }
        None => {}
    }
    if let Some(flag) = patch.is_completed {
        body.insert("is_completed".into(), Value::Bool(flag));
    }
    body
}

/// Translate SQL-style `%` wildcards into PostgREST's `*` syntax.
fn ilike_operand(pattern: &str) -> String {
    format!("ilike.{}", pattern.replace('%', "*"))
}

impl RemoteStore for RestStore {
    type Error = RestStoreError;

    fn list_tasks(&self) -> Result<Vec<Task>, Self::Error> {
        let mut url = self.endpoint(TASK_TABLE)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("user_id", &self.user_filter());
        let rows: Vec<TaskRow> = self.get_rows(url)?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    fn insert_task(&self, draft: &TaskDraft) -> Result<Task, Self::Error> {
        let url = self.endpoint(TASK_TABLE)?;
        let body = json!({
            "name": draft.name,
            "description": draft.description,
            "due_date": draft.due_date,
            "is_completed": draft.is_completed,
            "user_id": self.user_id,
        });
        let rows: Vec<TaskRow> = self.mutate_rows(self.client.post(url).json(&body), TASK_TABLE)?;
        Self::first_row(rows, "insert_task").map(Task::from)
    }

    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, Self::Error> {
        let mut url = self.endpoint(TASK_TABLE)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        let body = Value::Object(task_patch_body(patch));
        let rows: Vec<TaskRow> = self.mutate_rows(self.client.patch(url).json(&body), TASK_TABLE)?;
        Self::first_row(rows, "update_task").map(Task::from)
    }

    fn delete_task(&self, id: TaskId) -> Result<bool, Self::Error> {
        let mut url = self.endpoint(TASK_TABLE)?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{id}"))
            .append_pair("user_id", &self.user_filter());
        let rows: Vec<TaskRow> = self.mutate_rows(self.client.delete(url), TASK_TABLE)?;
        Ok(!rows.is_empty())
    }

    fn list_tags(&self) -> Result<Vec<Tag>, Self::Error> {
        let mut url = self.endpoint(TAG_TABLE)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("user_id", &self.user_filter());
        let rows: Vec<TagRow> = self.get_rows(url)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    fn list_tags_for_task(&self, id: TaskId) -> Result<Vec<Tag>, Self::Error> {
        let mut url = self.endpoint(TASK_TAG_VIEW)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("task_id", &format!("eq.{id}"))
            .append_pair("task_user_id", &self.user_filter())
            .append_pair("tag_user_id", &self.user_filter());
        let rows: Vec<TaskTagRow> = self.get_rows(url)?;
        Ok(rows.into_iter().map(TaskTagRow::into_tag).collect())
    }

    fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>, Self::Error> {
        let mut url = self.endpoint(TAG_TABLE)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("name", &format!("eq.{name}"))
            .append_pair("user_id", &self.user_filter());
        let rows: Vec<TagRow> = self.get_rows(url)?;
        Ok(rows.into_iter().next().map(Tag::from))
    }

    fn insert_tag(&self, draft: &TagDraft) -> Result<Tag, Self::Error> {
        let url = self.endpoint(TAG_TABLE)?;
        let mut body = Map::new();
        body.insert("name".into(), Value::String(draft.name.clone()));
        if let Some(description) = &draft.description {
            body.insert("description".into(), Value::String(description.clone()));
        }
        body.insert("user_id".into(), Value::String(self.user_id.clone()));
        let rows: Vec<TagRow> =
            self.mutate_rows(self.client.post(url).json(&Value::Object(body)), TAG_TABLE)?;
        Self::first_row(rows, "insert_tag").map(Tag::from)
    }

    fn update_tag(&self, id: TagId, patch: &TagPatch) -> Result<Tag, Self::Error> {
        let mut url = self.endpoint(TAG_TABLE)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        let body = json!({
            "name": patch.name,
            "description": patch.description,
        });
        let rows: Vec<TagRow> = self.mutate_rows(self.client.patch(url).json(&body), TAG_TABLE)?;
        Self::first_row(rows, "update_tag").map(Tag::from)
    }

    fn delete_tag(&self, id: TagId) -> Result<bool, Self::Error> {
        let mut url = self.endpoint(TAG_TABLE)?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{id}"))
            .append_pair("user_id", &self.user_filter());
        let rows: Vec<TagRow> = self.mutate_rows(self.client.delete(url), TAG_TABLE)?;
        Ok(!rows.is_empty())
    }

    fn link_task_tag(&self, task: TaskId, tag: TagId) -> Result<(), Self::Error> {
        let url = self.endpoint(JOIN_TABLE)?;
        let body = json!({ "task_id": task.0, "tag_id": tag.0 });
        let response = self.authorized(self.client.post(url).json(&body)).send()?;
        Self::expect_status(&response, JOIN_TABLE)
    }

    fn unlink_all_for_task(&self, task: TaskId) -> Result<(), Self::Error> {
        let mut url = self.endpoint(JOIN_TABLE)?;
        url.query_pairs_mut().append_pair("task_id", &format!("eq.{task}"));
        let response = self.authorized(self.client.delete(url)).send()?;
        Self::expect_status(&response, JOIN_TABLE)
    }

    fn search_tasks_by_tag_pattern(&self, pattern: &str) -> Result<Vec<Task>, Self::Error> {
        let mut url = self.endpoint(TASK_TAG_VIEW)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("task_user_id", &self.user_filter())
            .append_pair("tag_user_id", &self.user_filter())
            .append_pair("tag_name", &ilike_operand(pattern));
        let rows: Vec<TaskTagRow> = self.get_rows(url)?;
        Ok(rows.into_iter().map(TaskTagRow::into_task).collect())
    }
}
