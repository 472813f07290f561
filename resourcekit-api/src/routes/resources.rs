/// Resource CRUD endpoints
///
/// All endpoints require JWT authentication and only ever act on resources
/// owned by the caller.
///
/// # Endpoints
///
/// - `GET /api/resources` - List own resources (trailing slash optional)
/// - `POST /api/resources` - Create resource (trailing slash optional)
/// - `POST /api/resources/bulk` - Create up to 100 resources atomically
/// - `GET /api/resources/:id` - Get resource
/// - `PATCH /api/resources/:id` - Partial update
/// - `DELETE /api/resources/:id?hard=false` - Soft (default) or hard delete
///
/// # Access rules
///
/// Single-resource endpoints check existence first and ownership second: a
/// missing or soft-deleted resource is `404` for everyone, an existing resource
/// owned by someone else is `403`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use resourcekit_shared::{
    auth::{authorization::require_owner, middleware::AuthContext},
    models::{NewResource, Resource, ResourceChanges, ResourceFilter},
    services::{ResourceService, ServiceError, MAX_BULK_RESOURCES},
};
use serde::{Deserialize, Deserializer};
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

/// List query parameters
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListResourcesQuery {
    /// Rows to skip (default: 0)
    #[validate(range(min = 0, message = "skip must be >= 0"))]
    pub skip: Option<i64>,

    /// Page size (default: 100)
    #[validate(range(min = 1, max = 1000, message = "limit must be between 1 and 1000"))]
    pub limit: Option<i64>,

    /// Case-insensitive substring of the name
    pub search: Option<String>,

    /// Exact status
    pub status: Option<String>,
}

impl ListResourcesQuery {
    /// Builds the store filter for `user_id`
    pub fn into_filter(self, user_id: Uuid) -> ResourceFilter {
        let defaults = ResourceFilter::for_user(user_id);

        ResourceFilter {
            skip: self.skip.unwrap_or(defaults.skip),
            limit: self.limit.unwrap_or(defaults.limit),
            search: self.search,
            status: self.status,
            ..defaults
        }
    }
}

/// Delete query parameters
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    /// Remove the row instead of marking it deleted
    ///
    /// Accepts `true/false`, `1/0`, `yes/no` and `on/off`.
    #[serde(default, deserialize_with = "flag")]
    pub hard: bool,
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(serde::de::Error::custom(format!("`{}` is not a boolean", other))),
    }
}

/// Loads a live resource and checks the caller owns it
async fn load_owned(
    service: &ResourceService,
    auth: &AuthContext,
    id: Uuid,
) -> ApiResult<Resource> {
    let resource = service
        .get_resource(id)
        .await?
        .ok_or(ServiceError::NotFound(id))?;

    require_owner(auth, &resource).map_err(|e| {
        warn!(user_id = %auth.user_id, resource_id = %id, "Ownership check failed");
        e
    })?;

    Ok(resource)
}

/// List resources
///
/// ```text
/// GET /api/resources?skip=0&limit=100&search=doc&status=active
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `skip` or `limit` out of range, or not a number
/// - `401 Unauthorized`: Missing or invalid JWT token
pub async fn list_resources(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    query: Result<Query<ListResourcesQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Resource>>> {
    let Query(query) = query?;
    query.validate()?;

    let resources = state
        .service()
        .list_resources(query.into_filter(auth.user_id))
        .await?;

    Ok(Json(resources))
}

/// Get a single resource
///
/// # Errors
///
/// - `404 Not Found`: Resource does not exist or is soft-deleted
/// - `403 Forbidden`: Resource belongs to another user
pub async fn get_resource(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Resource>> {
    let Path(id) = id?;
    let resource = load_owned(&state.service(), &auth, id).await?;

    Ok(Json(resource))
}

/// Create a resource owned by the caller
///
/// ```text
/// POST /api/resources
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "name": "Quarterly report",
///   "description": "Q3 numbers",
///   "status": "active"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body or validation failed
pub async fn create_resource(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<NewResource>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Resource>)> {
    let Json(payload) = payload?;
    payload.validate()?;

    let resource = state.service().create_resource(auth.user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(resource)))
}

/// Update the supplied fields of a resource
///
/// Fields absent from the body are left untouched; `"description": null`
/// clears the description. An empty body returns the resource unchanged.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body or validation failed
/// - `404 Not Found`: Resource does not exist or is soft-deleted
/// - `403 Forbidden`: Resource belongs to another user
pub async fn update_resource(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ResourceChanges>, JsonRejection>,
) -> ApiResult<Json<Resource>> {
    let Path(id) = id?;
    let Json(changes) = payload?;
    changes.validate()?;

    let service = state.service();
    let resource = load_owned(&service, &auth, id).await?;
    let updated = service.update_resource(&resource, changes).await?;

    Ok(Json(updated))
}

/// Delete a resource
///
/// Soft delete hides the resource from every read; a second soft delete is `404`.
///
/// # Errors
///
/// - `404 Not Found`: Resource does not exist or is soft-deleted
/// - `403 Forbidden`: Resource belongs to another user
pub async fn delete_resource(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let Query(query) = query?;

    let service = state.service();
    let resource = load_owned(&service, &auth, id).await?;
    service.delete_resource(&resource, query.hard).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Create many resources as one unit
///
/// Items are validated in order and the first invalid item rejects the whole
/// batch; its field names are prefixed with the item index (`[3].name`).
///
/// # Errors
///
/// - `400 Bad Request`: More than 100 items, malformed body, or an invalid item
pub async fn bulk_create_resources(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<Vec<NewResource>>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Vec<Resource>>)> {
    let Json(items) = payload?;

    if items.len() > MAX_BULK_RESOURCES {
        return Err(ServiceError::BatchSizeExceeded {
            max: MAX_BULK_RESOURCES,
            actual: items.len(),
        }
        .into());
    }

    for (index, item) in items.iter().enumerate() {
        item.validate()
            .map_err(|e| ApiError::from(e).with_field_prefix(&format!("[{}]", index)))?;
    }

    let created = state
        .service()
        .bulk_create_resources(auth.user_id, items)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let user_id = Uuid::new_v4();
        let filter = ListResourcesQuery::default().into_filter(user_id);

        assert_eq!(filter, ResourceFilter::for_user(user_id));
        assert_eq!(filter.skip, 0);
        assert_eq!(filter.limit, ResourceFilter::DEFAULT_LIMIT);
    }

    #[test]
    fn test_list_query_ranges() {
        let query = ListResourcesQuery {
            limit: Some(1000),
            skip: Some(0),
            ..Default::default()
        };
        assert!(query.validate().is_ok());

        let query = ListResourcesQuery {
            limit: Some(1001),
            ..Default::default()
        };
        assert!(query.validate().is_err());

        let query = ListResourcesQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert!(query.validate().is_err());

        let query = ListResourcesQuery {
            skip: Some(-1),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_delete_query_flag_forms() {
        fn hard(uri: &str) -> Option<bool> {
            let uri: axum::http::Uri = uri.parse().unwrap();
            Query::<DeleteQuery>::try_from_uri(&uri).ok().map(|q| q.0.hard)
        }

        assert_eq!(hard("/r"), Some(false));
        for yes in ["true", "1", "yes", "on", "TRUE"] {
            assert_eq!(hard(&format!("/r?hard={}", yes)), Some(true), "{}", yes);
        }
        for no in ["false", "0", "no", "off"] {
            assert_eq!(hard(&format!("/r?hard={}", no)), Some(false), "{}", no);
        }
        assert_eq!(hard("/r?hard=maybe"), None);
    }

    #[test]
    fn test_list_query_passes_filters_through() {
        let user_id = Uuid::new_v4();
        let filter = ListResourcesQuery {
            skip: Some(10),
            limit: Some(5),
            search: Some("doc".to_string()),
            status: Some("archived".to_string()),
        }
        .into_filter(user_id);

        assert_eq!(filter.user_id, user_id);
        assert_eq!(filter.skip, 10);
        assert_eq!(filter.limit, 5);
        assert_eq!(filter.search.as_deref(), Some("doc"));
        assert_eq!(filter.status.as_deref(), Some("archived"));
    }
}
