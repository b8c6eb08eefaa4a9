use super::Resource;
use crate::schema::{Field, Shape};
use crate::{Client, RequestDescriptor, Result};
use serde::{Deserialize, Serialize};

/// A workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    /// The workspace ID.
    pub id: u64,
    /// Workspace name.
    pub name: String,
    /// Whether the workspace is on a paid plan.
    pub premium: bool,
    /// Owning organization.
    pub organization_id: Option<u64>,
    /// Whether the current user administers it.
    pub admin: Option<bool>,
    /// Currency code for rates.
    pub default_currency: Option<String>,
    /// Hourly rate applied when a project sets none.
    pub default_hourly_rate: Option<f64>,
    /// Last modification time.
    pub at: Option<String>,
}

impl Resource for Workspace {
    fn shape() -> Shape {
        Shape::object([
            Field::required("id", Shape::Number),
            Field::required("name", Shape::String),
            Field::required("premium", Shape::Bool),
            Field::optional("organization_id", Shape::Number),
            Field::optional("admin", Shape::Bool),
            Field::optional("default_currency", Shape::String),
            Field::optional("default_hourly_rate", Shape::Number.nullable()),
            Field::optional("at", Shape::String),
        ])
    }
}

/// `/workspaces` endpoints.
pub struct WorkspaceEndpoints<'a> {
    client: &'a Client,
}

impl<'a> WorkspaceEndpoints<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Every workspace the user belongs to.
    pub async fn list(&self) -> Result<Vec<Workspace>> {
        self.client.fetch_list(RequestDescriptor::get("/workspaces")).await
    }

    /// One workspace.
    pub async fn get(&self, workspace_id: u64) -> Result<Workspace> {
        self.client
            .fetch(RequestDescriptor::get(format!("/workspaces/{workspace_id}")))
            .await
    }
}
