//! # togglr - a Toggl Track API client
//!
//! togglr wraps the Toggl Track v9 REST API. Every call goes through the same
//! pipeline: a single authenticated HTTP attempt, a bounded wait-and-retry
//! loop when the API rate limits us, and translation of any other failure
//! into a closed set of error kinds. Successful bodies are checked against a
//! declared shape before they become typed values.
//!
//! ## Quick Start
//!
//! ```no_run
//! use togglr::{Client, Config, StartTimeEntry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), togglr::Error> {
//!     // Reads TOGGL_API_TOKEN (and a .env file, if present)
//!     let client = Client::new(Config::from_env(None, None)?)?;
//!
//!     let me = client.me().get(false).await?;
//!     println!("Hello, {}", me.fullname);
//!
//!     let entry = client
//!         .time_entries()
//!         .start(
//!             me.default_workspace_id,
//!             StartTimeEntry {
//!                 description: Some("Writing docs".to_string()),
//!                 ..Default::default()
//!             },
//!         )
//!         .await?;
//!     println!("Started entry {}", entry.id);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```no_run
//! use togglr::{ApiError, Client, Config, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::new(Config::from_env(None, None)?)?;
//! match client.workspaces().get(123).await {
//!     Ok(workspace) => println!("{}", workspace.name),
//!     Err(Error::Api(ApiError::NotFound { message })) => eprintln!("{message}"),
//!     Err(Error::Api(ApiError::RateLimit { retry_after, .. })) => {
//!         eprintln!("Still rate limited after retrying, wait {retry_after}s");
//!     }
//!     Err(Error::Schema(e)) => eprintln!("Unexpected response: {e}"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Raw Requests
//!
//! Anything the typed endpoints don't cover can be sent as a
//! [`RequestDescriptor`] and validated against a hand-written [`Shape`]:
//!
//! ```no_run
//! use togglr::schema::{Field, Shape};
//! use togglr::{Client, Config, RequestDescriptor};
//!
//! # async fn example() -> Result<(), togglr::Error> {
//! # let client = Client::new(Config::from_env(None, None)?)?;
//! let shape = Shape::array(Shape::object([
//!     Field::required("id", Shape::Number),
//!     Field::required("name", Shape::String),
//! ]));
//! let tags: serde_json::Value = client
//!     .fetch_as(RequestDescriptor::get("/workspaces/1/tags"), &shape)
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
pub mod config;
mod error;
mod request;
pub mod resources;
mod response;
pub mod retry;
pub mod schema;
pub mod transport;

pub use client::{Client, ClientBuilder};
pub use config::{ApiToken, Config};
pub use error::{ApiError, Error, FieldError, Result};
pub use request::RequestDescriptor;
pub use resources::{
    ListProjects, ListTimeEntries, NewProject, NewTimeEntry, OrganizationQuota, Project,
    StartTimeEntry, TimeEntry, TimeEntryUpdate, User, Workspace,
};
pub use response::Response;
pub use retry::RetryPolicy;
pub use schema::{SchemaError, Shape};
