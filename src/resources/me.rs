use super::Resource;
use crate::schema::{Field, Shape};
use crate::{Client, RequestDescriptor, Result};
use serde::{Deserialize, Serialize};

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user ID.
    pub id: u64,
    /// Login email address.
    pub email: String,
    /// Display name.
    pub fullname: String,
    /// IANA time zone, e.g. `Europe/Berlin`.
    pub timezone: String,
    /// Workspace new entries go to by default.
    pub default_workspace_id: u64,
    /// First day of the week, `0` for Sunday.
    pub beginning_of_week: u8,
    /// Avatar URL.
    pub image_url: Option<String>,
    /// Account creation time.
    pub created_at: String,
    /// Last profile update.
    pub updated_at: Option<String>,
    /// Country ID, if set.
    pub country_id: Option<u64>,
    /// Whether the account has a password (as opposed to SSO only).
    pub has_password: Option<bool>,
    /// Last modification time.
    pub at: Option<String>,
    /// Whether OpenID login is enabled.
    pub openid_enabled: Option<bool>,
}

impl Resource for User {
    fn shape() -> Shape {
        Shape::object([
            Field::required("id", Shape::Number),
            Field::required("email", Shape::String),
            Field::required("fullname", Shape::String),
            Field::required("timezone", Shape::String),
            Field::required("default_workspace_id", Shape::Number),
            Field::required("beginning_of_week", Shape::Number),
            Field::required("image_url", Shape::String.nullable()),
            Field::required("created_at", Shape::String),
            Field::optional("updated_at", Shape::String),
            Field::optional("country_id", Shape::Number.nullable()),
            Field::optional("has_password", Shape::Bool),
            Field::optional("at", Shape::String),
            Field::optional("openid_enabled", Shape::Bool),
        ])
    }
}

/// API request quota for one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationQuota {
    /// The organization the quota applies to.
    pub organization_id: u64,
    /// Requests left in the current window.
    pub remaining: u64,
    /// Requests allowed per window.
    pub total: u64,
    /// Seconds until the window resets.
    pub resets_in_secs: u64,
}

impl Resource for OrganizationQuota {
    fn shape() -> Shape {
        Shape::object([
            Field::required("remaining", Shape::Number),
            Field::required("total", Shape::Number),
            Field::required("resets_in_secs", Shape::Number),
            Field::required("organization_id", Shape::Number),
        ])
    }
}

/// `/me` endpoints.
pub struct MeEndpoints<'a> {
    client: &'a Client,
}

impl<'a> MeEndpoints<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// The authenticated user's profile.
    pub async fn get(&self, with_related_data: bool) -> Result<User> {
        let mut request = RequestDescriptor::get("/me");
        if with_related_data {
            request = request.with_query_param("with_related_data", true);
        }
        self.client.fetch(request).await
    }

    /// Remaining API quota per organization.
    pub async fn quota(&self) -> Result<Vec<OrganizationQuota>> {
        self.client.fetch_list(RequestDescriptor::get("/me/quota")).await
    }
}
