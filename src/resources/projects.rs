use super::Resource;
use crate::schema::{Field, Shape};
use crate::{Client, RequestDescriptor, Result};
use serde::{Deserialize, Serialize};

/// A project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// The project ID.
    pub id: u64,
    /// Workspace the project belongs to.
    pub workspace_id: u64,
    /// Client the project is for, if any.
    pub client_id: Option<u64>,
    /// Project name.
    pub name: String,
    /// Whether only members can see it.
    pub is_private: bool,
    /// `false` once archived.
    pub active: bool,
    /// Last modification time.
    pub at: String,
    /// Hex color, e.g. `#06aaf5`.
    pub color: String,
    /// Creation time.
    pub created_at: Option<String>,
    /// Whether time on the project is billable by default.
    pub billable: Option<bool>,
    /// Planned effort in hours.
    pub estimated_hours: Option<f64>,
    /// Hours tracked so far.
    pub actual_hours: Option<f64>,
    /// Hourly rate.
    pub rate: Option<f64>,
    /// Currency code for `rate`.
    pub currency: Option<String>,
}

impl Resource for Project {
    fn shape() -> Shape {
        Shape::object([
            Field::required("id", Shape::Number),
            Field::required("workspace_id", Shape::Number),
            Field::required("client_id", Shape::Number.nullable()),
            Field::required("name", Shape::String),
            Field::required("is_private", Shape::Bool),
            Field::required("active", Shape::Bool),
            Field::required("at", Shape::String),
            Field::required("color", Shape::String),
            Field::optional("created_at", Shape::String),
            Field::optional("billable", Shape::Bool.nullable()),
            Field::optional("estimated_hours", Shape::Number.nullable()),
            Field::optional("actual_hours", Shape::Number.nullable()),
            Field::optional("rate", Shape::Number.nullable()),
            Field::optional("currency", Shape::String.nullable()),
        ])
    }
}

/// Body for creating a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewProject {
    /// Project name.
    pub name: String,
    /// Client the project is for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
    /// Hex color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Restrict visibility to members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    /// Create it archived (`false`) or active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Billable by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
}

/// Filters for listing projects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListProjects {
    /// Only active (`true`) or archived (`false`) projects.
    pub active: Option<bool>,
    /// Only projects for these clients, sent comma-separated.
    pub client_ids: Vec<u64>,
}

/// Project endpoints.
pub struct ProjectEndpoints<'a> {
    client: &'a Client,
}

impl<'a> ProjectEndpoints<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Projects in a workspace.
    pub async fn list(&self, workspace_id: u64, filter: &ListProjects) -> Result<Vec<Project>> {
        let mut request = RequestDescriptor::get(format!("/workspaces/{workspace_id}/projects"))
            .with_optional_query_param("active", filter.active);
        if !filter.client_ids.is_empty() {
            let ids = filter
                .client_ids
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            request = request.with_query_param("client_ids", ids);
        }
        self.client.fetch_list(request).await
    }

    /// One project.
    pub async fn get(&self, workspace_id: u64, project_id: u64) -> Result<Project> {
        self.client
            .fetch(RequestDescriptor::get(format!(
                "/workspaces/{workspace_id}/projects/{project_id}"
            )))
            .await
    }

    /// Creates a project.
    pub async fn create(&self, workspace_id: u64, project: &NewProject) -> Result<Project> {
        let request = RequestDescriptor::post(format!("/workspaces/{workspace_id}/projects"))
            .with_body(project)?;
        self.client.fetch(request).await
    }

    /// Deletes a project.
    pub async fn delete(&self, workspace_id: u64, project_id: u64) -> Result<()> {
        self.client
            .execute(RequestDescriptor::delete(format!(
                "/workspaces/{workspace_id}/projects/{project_id}"
            )))
            .await?;
        Ok(())
    }
}
