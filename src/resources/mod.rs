//! Typed Toggl resources and the endpoints that return them.
//!
//! Each resource declares a [`Shape`] that its JSON must match before it is
//! converted. Endpoint groups are borrowed from a [`Client`](crate::Client),
//! e.g. `client.time_entries().current()`.

mod me;
mod projects;
mod time_entries;
mod workspaces;

pub use me::{MeEndpoints, OrganizationQuota, User};
pub use projects::{ListProjects, NewProject, Project, ProjectEndpoints};
pub use time_entries::{
    ListTimeEntries, NewTimeEntry, StartTimeEntry, TimeEntry, TimeEntryEndpoints,
    TimeEntryUpdate, CREATED_WITH,
};
pub use workspaces::{Workspace, WorkspaceEndpoints};

use crate::schema::Shape;
use serde::de::DeserializeOwned;

/// A value the API returns, with the shape its JSON must have.
pub trait Resource: DeserializeOwned {
    /// The declared shape of one instance.
    fn shape() -> Shape;
}
