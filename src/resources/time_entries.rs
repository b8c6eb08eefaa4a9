use super::Resource;
use crate::schema::{Field, Shape};
use crate::{Client, RequestDescriptor, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value sent as `created_with` when the caller doesn't set one.
pub const CREATED_WITH: &str = "togglr";

/// A time entry. A running entry has no `stop` and a negative `duration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// The entry ID.
    pub id: u64,
    /// Workspace the entry belongs to.
    pub workspace_id: u64,
    /// Project the time was tracked on, if any.
    pub project_id: Option<u64>,
    /// Task within the project, if any.
    pub task_id: Option<u64>,
    /// Whether the time is billable.
    pub billable: bool,
    /// Start time (RFC 3339).
    pub start: String,
    /// Stop time (RFC 3339). `None` while running.
    pub stop: Option<String>,
    /// Duration in seconds. Negative while running: minus the start's Unix
    /// timestamp.
    pub duration: i64,
    /// Free-text description.
    pub description: Option<String>,
    /// Tag names.
    pub tags: Option<Vec<String>>,
    /// Tag IDs.
    pub tag_ids: Option<Vec<u64>>,
    /// Last modification time.
    pub at: String,
    /// Owner of the entry.
    pub user_id: u64,
    /// Set once the entry has been deleted.
    pub server_deleted_at: Option<String>,
}

impl TimeEntry {
    /// Returns `true` while the timer is still running.
    pub fn is_running(&self) -> bool {
        self.duration < 0
    }
}

impl Resource for TimeEntry {
    fn shape() -> Shape {
        Shape::object([
            Field::required("id", Shape::Number),
            Field::required("workspace_id", Shape::Number),
            Field::required("project_id", Shape::Number.nullable()),
            Field::optional("task_id", Shape::Number.nullable()),
            Field::required("billable", Shape::Bool),
            Field::required("start", Shape::String),
            Field::required("stop", Shape::String.nullable()),
            Field::required("duration", Shape::Number),
            Field::required("description", Shape::String.nullable()),
            Field::optional("tags", Shape::array(Shape::String).nullable()),
            Field::optional("tag_ids", Shape::array(Shape::Number).nullable()),
            Field::required("at", Shape::String),
            Field::required("user_id", Shape::Number),
            Field::optional("server_deleted_at", Shape::String.nullable()),
        ])
    }
}

/// Body for creating a time entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewTimeEntry {
    /// Target workspace. Overwritten by [`TimeEntryEndpoints::create`].
    pub workspace_id: u64,
    /// Start time (RFC 3339).
    pub start: String,
    /// Duration in seconds, or minus the start's Unix timestamp for a
    /// running timer.
    pub duration: i64,
    /// Name of the creating application. Defaults to [`CREATED_WITH`].
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_with: String,
    /// Stop time (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Project to track the time on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    /// Task within the project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
    /// Whether the time is billable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
    /// Tag names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Tag IDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<u64>>,
}

/// Changes to an existing time entry. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeEntryUpdate {
    /// New start time (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// New stop time (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
    /// New duration in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    /// New task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
    /// New billable flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
    /// Replacement tag names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Replacement tag IDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<u64>>,
}

/// Options for starting a running timer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartTimeEntry {
    /// Free-text description.
    pub description: Option<String>,
    /// Project to track the time on.
    pub project_id: Option<u64>,
    /// Task within the project.
    pub task_id: Option<u64>,
    /// Tag names.
    pub tags: Option<Vec<String>>,
    /// Tag IDs.
    pub tag_ids: Option<Vec<u64>>,
    /// Whether the time is billable.
    pub billable: Option<bool>,
}

impl StartTimeEntry {
    /// The creation body for a timer started at `now`.
    pub fn into_new_entry(self, workspace_id: u64, now: DateTime<Utc>) -> NewTimeEntry {
        NewTimeEntry {
            workspace_id,
            start: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            duration: -now.timestamp(),
            created_with: CREATED_WITH.to_string(),
            stop: None,
            description: self.description,
            project_id: self.project_id,
            task_id: self.task_id,
            billable: self.billable,
            tags: self.tags,
            tag_ids: self.tag_ids,
        }
    }
}

/// Filters for listing the user's time entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListTimeEntries {
    /// Earliest start date (`YYYY-MM-DD`), sent as `start_date`.
    pub start_date: Option<String>,
    /// Latest start date (`YYYY-MM-DD`), sent as `end_date`.
    pub end_date: Option<String>,
    /// Ask the API to include related names (`meta=true`).
    pub meta: bool,
}

/// Time entry endpoints.
pub struct TimeEntryEndpoints<'a> {
    client: &'a Client,
}

impl<'a> TimeEntryEndpoints<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// The user's time entries, optionally within a date range.
    pub async fn list(&self, filter: &ListTimeEntries) -> Result<Vec<TimeEntry>> {
        let mut request = RequestDescriptor::get("/me/time_entries")
            .with_optional_query_param("start_date", filter.start_date.as_deref())
            .with_optional_query_param("end_date", filter.end_date.as_deref());
        if filter.meta {
            request = request.with_query_param("meta", true);
        }
        self.client.fetch_list(request).await
    }

    /// The running time entry, if any.
    pub async fn current(&self) -> Result<Option<TimeEntry>> {
        let response = self
            .client
            .execute(RequestDescriptor::get("/me/time_entries/current"))
            .await?;
        match response.data {
            Value::Null => Ok(None),
            body => Ok(Some(crate::schema::validate(&TimeEntry::shape(), body)?)),
        }
    }

    /// One time entry.
    pub async fn get(&self, time_entry_id: u64) -> Result<TimeEntry> {
        self.client
            .fetch(RequestDescriptor::get(format!(
                "/me/time_entries/{time_entry_id}"
            )))
            .await
    }

    /// Creates a time entry in `workspace_id`.
    pub async fn create(&self, workspace_id: u64, mut entry: NewTimeEntry) -> Result<TimeEntry> {
        entry.workspace_id = workspace_id;
        if entry.created_with.is_empty() {
            entry.created_with = CREATED_WITH.to_string();
        }
        let request = RequestDescriptor::post(format!("/workspaces/{workspace_id}/time_entries"))
            .with_body(&entry)?;
        self.client.fetch(request).await
    }

    /// Updates a time entry, sending only the fields set in `update`.
    pub async fn update(
        &self,
        workspace_id: u64,
        time_entry_id: u64,
        update: &TimeEntryUpdate,
    ) -> Result<TimeEntry> {
        let request = RequestDescriptor::put(format!(
            "/workspaces/{workspace_id}/time_entries/{time_entry_id}"
        ))
        .with_body(update)?;
        self.client.fetch(request).await
    }

    /// Starts a timer now.
    pub async fn start(&self, workspace_id: u64, options: StartTimeEntry) -> Result<TimeEntry> {
        let entry = options.into_new_entry(workspace_id, Utc::now());
        self.create(workspace_id, entry).await
    }

    /// Stops a running timer.
    pub async fn stop(&self, workspace_id: u64, time_entry_id: u64) -> Result<TimeEntry> {
        self.client
            .fetch(RequestDescriptor::patch(format!(
                "/workspaces/{workspace_id}/time_entries/{time_entry_id}/stop"
            )))
            .await
    }

    /// Deletes a time entry.
    pub async fn delete(&self, workspace_id: u64, time_entry_id: u64) -> Result<()> {
        self.client
            .execute(RequestDescriptor::delete(format!(
                "/workspaces/{workspace_id}/time_entries/{time_entry_id}"
            )))
            .await?;
        Ok(())
    }
}
