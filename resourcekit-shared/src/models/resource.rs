/// Resource model and payload types
///
/// A resource is an owned record with a name, an optional description and a
/// lifecycle status. Deleting a resource is soft by default: `deleted_at` is
/// set and the row stays in the table, invisible to every read path.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE resources (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL CHECK (length(btrim(name)) > 0),
///     description VARCHAR(2000),
///     status TEXT NOT NULL DEFAULT 'active'
///         CHECK (status IN ('active', 'inactive', 'archived')),
///     user_id UUID NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```
/// use resourcekit_shared::models::resource::{NewResource, ResourceStatus};
/// use validator::Validate;
///
/// let payload: NewResource = serde_json::from_str(r#"{"name": "Build cache"}"#).unwrap();
/// assert!(payload.validate().is_ok());
/// assert_eq!(payload.status_or_default(), ResourceStatus::Active);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Maximum length of `name`, matching the column width
pub const NAME_MAX_LEN: u64 = 255;

/// Maximum length of `description`, matching the column width
pub const DESCRIPTION_MAX_LEN: u64 = 2000;

/// Lifecycle status of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    /// In use (default for new resources)
    #[default]
    Active,

    /// Temporarily disabled
    Inactive,

    /// Kept for reference, no longer in use
    Archived,
}

impl ResourceStatus {
    /// Converts status to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Active => "active",
            ResourceStatus::Inactive => "inactive",
            ResourceStatus::Archived => "archived",
        }
    }

    /// Parses a stored status string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ResourceStatus::Active),
            "inactive" => Some(ResourceStatus::Inactive),
            "archived" => Some(ResourceStatus::Archived),
            _ => None,
        }
    }
}

impl TryFrom<String> for ResourceStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown resource status: {}", value))
    }
}

/// Resource row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Resource {
    /// Unique resource ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Free-form description
    pub description: Option<String>,

    /// Lifecycle status
    #[sqlx(try_from = "String")]
    pub status: ResourceStatus,

    /// Owning user; fixed at creation
    pub user_id: Uuid,

    /// When the resource was created
    pub created_at: DateTime<Utc>,

    /// When the resource was last modified
    pub updated_at: DateTime<Utc>,

    /// Soft deletion marker (null while the resource is live)
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Resource {
    /// Returns true once the resource has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns true if `user_id` owns this resource
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Payload for creating a resource
///
/// The owner is never part of the payload; it is always the caller.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewResource {
    /// Resource name (required)
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    /// Optional description
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    #[serde(default)]
    pub description: Option<String>,

    /// Initial status (default: active)
    #[serde(default)]
    pub status: Option<ResourceStatus>,
}

impl NewResource {
    /// Creates a payload with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            status: None,
        }
    }

    /// Status to persist, falling back to `active`
    pub fn status_or_default(&self) -> ResourceStatus {
        self.status.unwrap_or_default()
    }
}

/// Partial update payload
///
/// Every field distinguishes "absent" (`None`, left untouched) from "present"
/// (`Some(..)`). A present `description` may be `Some(None)` to clear it; a
/// present `name` or `status` must carry a value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceChanges {
    /// New name
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,

    /// New description (use Some(None) to clear)
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,

    /// New status
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub status: Option<Option<ResourceStatus>>,
}

impl ResourceChanges {
    /// Returns true if no field was supplied
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }

    /// Applies the supplied fields onto `resource`
    ///
    /// Absent fields are left as they are. Call `validate` first; an explicit
    /// null for a non-nullable field is skipped here.
    pub fn apply_to(&self, resource: &mut Resource) {
        if let Some(Some(name)) = &self.name {
            resource.name = name.clone();
        }
        if let Some(description) = &self.description {
            resource.description = description.clone();
        }
        if let Some(Some(status)) = self.status {
            resource.status = status;
        }
    }
}

impl Validate for ResourceChanges {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match &self.name {
            Some(None) => errors.add("name", field_error("null", "Name cannot be null")),
            Some(Some(name)) => {
                let len = name.chars().count() as u64;
                if len == 0 || len > NAME_MAX_LEN {
                    errors.add("name", field_error("length", "Name must be 1-255 characters"));
                } else if let Err(e) = validate_not_blank(name) {
                    errors.add("name", e);
                }
            }
            None => {}
        }

        if let Some(Some(description)) = &self.description {
            if description.chars().count() as u64 > DESCRIPTION_MAX_LEN {
                errors.add(
                    "description",
                    field_error("length", "Description must be at most 2000 characters"),
                );
            }
        }

        if let Some(None) = self.status {
            errors.add("status", field_error("null", "Status cannot be null"));
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Query filter for listing a user's resources
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceFilter {
    /// Owner whose resources are listed
    pub user_id: Uuid,

    /// Number of matching rows to skip
    pub skip: i64,

    /// Maximum number of rows to return
    pub limit: i64,

    /// Case-insensitive substring match on `name`
    pub search: Option<String>,

    /// Exact match on `status` (unknown values match nothing)
    pub status: Option<String>,
}

impl ResourceFilter {
    /// Default page size
    pub const DEFAULT_LIMIT: i64 = 100;

    /// Largest accepted page size
    pub const MAX_LIMIT: i64 = 1000;

    /// Filter for the first default-sized page of a user's resources
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
            search: None,
            status: None,
        }
    }

    /// Search term, with empty strings treated as absent
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    /// Status filter, with empty strings treated as absent
    pub fn status_term(&self) -> Option<&str> {
        self.status.as_deref().filter(|s| !s.is_empty())
    }

    /// Returns true if `resource` passes every condition except pagination
    pub fn matches(&self, resource: &Resource) -> bool {
        if resource.is_deleted() || !resource.is_owned_by(self.user_id) {
            return false;
        }
        if let Some(search) = self.search_term() {
            if !resource
                .name
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }
        if let Some(status) = self.status_term() {
            if resource.status.as_str() != status {
                return false;
            }
        }
        true
    }
}

/// Rejects names made only of whitespace
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("blank", "Name cannot be blank"));
    }
    Ok(())
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Deserializes a present field, keeping an explicit `null` as `Some(None)`
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
