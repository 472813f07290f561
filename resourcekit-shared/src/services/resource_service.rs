/// Owner-scoped resource operations
///
/// `ResourceService` sits between the HTTP handlers and the store. It knows
/// nothing about status codes: it returns domain objects or a `ServiceError`,
/// and the API layer decides how each error is reported.
///
/// # Failure semantics
///
/// Every call is a single attempt. Constraint violations raised by the store
/// become `ServiceError::Validation`; anything else the store reports is
/// passed through as `ServiceError::Store`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use resourcekit_shared::models::NewResource;
/// use resourcekit_shared::services::resource_service::ResourceService;
/// use resourcekit_shared::store::memory::MemoryResourceStore;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), resourcekit_shared::services::ServiceError> {
/// let service = ResourceService::new(Arc::new(MemoryResourceStore::new()));
/// let owner = Uuid::new_v4();
///
/// let resource = service.create_resource(owner, NewResource::named("Docs")).await?;
/// assert_eq!(resource.user_id, owner);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::models::{NewResource, Resource, ResourceChanges, ResourceFilter};
use crate::store::ResourceStore;

/// Largest batch accepted by `bulk_create_resources`
pub const MAX_BULK_RESOURCES: usize = 100;

/// Data access for resources, scoped by the calling user
#[derive(Clone)]
pub struct ResourceService {
    store: Arc<dyn ResourceStore>,
}

impl ResourceService {
    /// Creates a service over `store`
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    /// Lists the caller's live resources
    ///
    /// `filter.user_id` scopes the query; soft-deleted rows are never returned.
    pub async fn list_resources(&self, filter: ResourceFilter) -> ServiceResult<Vec<Resource>> {
        if filter.skip < 0 {
            return Err(ServiceError::Validation(
                "skip must be greater than or equal to 0".to_string(),
            ));
        }
        if !(1..=ResourceFilter::MAX_LIMIT).contains(&filter.limit) {
            return Err(ServiceError::Validation(format!(
                "limit must be between 1 and {}",
                ResourceFilter::MAX_LIMIT
            )));
        }

        Ok(self.store.list(&filter).await?)
    }

    /// Looks up a live resource by ID regardless of owner
    ///
    /// Ownership is checked by the caller once the resource is known to exist.
    pub async fn get_resource(&self, id: Uuid) -> ServiceResult<Option<Resource>> {
        Ok(self.store.find_active(id).await?)
    }

    /// Creates a resource owned by `user_id`
    pub async fn create_resource(
        &self,
        user_id: Uuid,
        data: NewResource,
    ) -> ServiceResult<Resource> {
        let resource = self.store.insert(user_id, data).await?;
        info!(resource_id = %resource.id, user_id = %user_id, "Resource created");
        Ok(resource)
    }

    /// Creates up to `MAX_BULK_RESOURCES` resources as one unit
    ///
    /// Oversized batches are rejected before anything is written. If any item
    /// fails, none of the batch is kept.
    pub async fn bulk_create_resources(
        &self,
        user_id: Uuid,
        items: Vec<NewResource>,
    ) -> ServiceResult<Vec<Resource>> {
        if items.len() > MAX_BULK_RESOURCES {
            return Err(ServiceError::BatchSizeExceeded {
                max: MAX_BULK_RESOURCES,
                actual: items.len(),
            });
        }
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let created = self.store.insert_batch(user_id, items).await?;
        info!(user_id = %user_id, count = created.len(), "Resources bulk created");
        Ok(created)
    }

    /// Applies the supplied fields of `changes` to `resource`
    ///
    /// An empty change set is a no-op and returns the resource untouched.
    pub async fn update_resource(
        &self,
        resource: &Resource,
        changes: ResourceChanges,
    ) -> ServiceResult<Resource> {
        if changes.is_empty() {
            debug!(resource_id = %resource.id, "Empty update, nothing to apply");
            return Ok(resource.clone());
        }

        let updated = self.store.update(resource.id, &changes).await?;
        info!(resource_id = %resource.id, "Resource updated");
        Ok(updated)
    }

    /// Deletes `resource`, softly unless `hard` is set
    pub async fn delete_resource(&self, resource: &Resource, hard: bool) -> ServiceResult<()> {
        if hard {
            self.store.hard_delete(resource.id).await?;
        } else {
            self.store.soft_delete(resource.id).await?;
        }

        info!(resource_id = %resource.id, hard, "Resource deleted");
        Ok(())
    }
}
