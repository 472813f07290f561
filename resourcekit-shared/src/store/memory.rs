/// In-process resource store
///
/// Holds rows in insertion order behind a `tokio::sync::RwLock` and checks the
/// same constraints the `resources` table declares (non-blank name, column
/// widths), so it fails the same writes PostgreSQL would. Used by the test
/// suites and for running the API without a database.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{ResourceStore, StoreError};
use crate::models::resource::{DESCRIPTION_MAX_LEN, NAME_MAX_LEN};
use crate::models::{NewResource, Resource, ResourceChanges, ResourceFilter};

/// `ResourceStore` kept in memory
///
/// Cloning shares the underlying rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryResourceStore {
    rows: Arc<RwLock<Vec<Resource>>>,
}

impl MemoryResourceStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, soft-deleted ones included
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns true if no row is stored at all
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

fn check_name(name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::Constraint(
            "new row for relation \"resources\" violates check constraint \"resources_name_check\""
                .to_string(),
        ));
    }
    if name.chars().count() as u64 > NAME_MAX_LEN {
        return Err(StoreError::Constraint(format!(
            "value too long for type character varying({})",
            NAME_MAX_LEN
        )));
    }
    Ok(())
}

fn check_description(description: Option<&str>) -> Result<(), StoreError> {
    match description {
        Some(d) if d.chars().count() as u64 > DESCRIPTION_MAX_LEN => {
            Err(StoreError::Constraint(format!(
                "value too long for type character varying({})",
                DESCRIPTION_MAX_LEN
            )))
        }
        _ => Ok(()),
    }
}

fn check_new(data: &NewResource) -> Result<(), StoreError> {
    check_name(&data.name)?;
    check_description(data.description.as_deref())
}

fn build_row(user_id: Uuid, data: NewResource) -> Resource {
    let now = Utc::now();
    let status = data.status_or_default();
    Resource {
        id: Uuid::new_v4(),
        name: data.name,
        description: data.description,
        status,
        user_id,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, StoreError> {
        let rows = self.rows.read().await;
        let skip = usize::try_from(filter.skip).unwrap_or(0);
        let limit = usize::try_from(filter.limit).unwrap_or(0);

        Ok(rows
            .iter()
            .filter(|r| filter.matches(r))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_active(&self, id: Uuid) -> Result<Option<Resource>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.id == id && !r.is_deleted()).cloned())
    }

    async fn find_any(&self, id: Uuid) -> Result<Option<Resource>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, user_id: Uuid, data: NewResource) -> Result<Resource, StoreError> {
        check_new(&data)?;

        let resource = build_row(user_id, data);
        self.rows.write().await.push(resource.clone());

        debug!(resource_id = %resource.id, user_id = %user_id, "Inserted resource");
        Ok(resource)
    }

    async fn insert_batch(
        &self,
        user_id: Uuid,
        items: Vec<NewResource>,
    ) -> Result<Vec<Resource>, StoreError> {
        // Check everything before touching the rows so a failure leaves no trace
        for data in &items {
            check_new(data)?;
        }

        let created: Vec<Resource> = items
            .into_iter()
            .map(|data| build_row(user_id, data))
            .collect();

        self.rows.write().await.extend(created.iter().cloned());

        debug!(user_id = %user_id, count = created.len(), "Inserted resource batch");
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: &ResourceChanges) -> Result<Resource, StoreError> {
        if let Some(Some(name)) = &changes.name {
            check_name(name)?;
        }
        if let Some(description) = &changes.description {
            check_description(description.as_deref())?;
        }

        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|r| r.id == id && !r.is_deleted())
            .ok_or(StoreError::NotFound(id))?;

        changes.apply_to(row);
        row.updated_at = Utc::now();

        debug!(resource_id = %id, "Updated resource");
        Ok(row.clone())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|r| r.id == id && !r.is_deleted())
            .ok_or(StoreError::NotFound(id))?;

        row.deleted_at = Some(Utc::now());

        debug!(resource_id = %id, "Soft-deleted resource");
        Ok(())
    }

    async fn hard_delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.id != id);

        if rows.len() == before {
            return Err(StoreError::NotFound(id));
        }

        debug!(resource_id = %id, "Hard-deleted resource");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceStatus;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryResourceStore::new();
        let owner = Uuid::new_v4();

        let created = store.insert(owner, NewResource::named("Docs")).await.unwrap();
        assert_eq!(created.user_id, owner);
        assert_eq!(created.status, ResourceStatus::Active);
        assert!(created.deleted_at.is_none());

        let found = store.find_active(created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_name() {
        let store = MemoryResourceStore::new();

        let err = store
            .insert(Uuid::new_v4(), NewResource::named("  "))
            .await
            .unwrap_err();

        assert!(err.is_constraint());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_insert_batch_is_all_or_nothing() {
        let store = MemoryResourceStore::new();
        let owner = Uuid::new_v4();

        let items = vec![
            NewResource::named("one"),
            NewResource::named("two"),
            NewResource::named("x".repeat(300)),
            NewResource::named("four"),
        ];

        let err = store.insert_batch(owner, items).await.unwrap_err();
        assert!(err.is_constraint());
        assert_eq!(store.len().await, 0);

        let created = store
            .insert_batch(owner, vec![NewResource::named("a"), NewResource::named("b")])
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_list_paginates_in_insertion_order() {
        let store = MemoryResourceStore::new();
        let owner = Uuid::new_v4();

        for i in 0..5 {
            store
                .insert(owner, NewResource::named(format!("item-{}", i)))
                .await
                .unwrap();
        }
        store
            .insert(Uuid::new_v4(), NewResource::named("someone else"))
            .await
            .unwrap();

        let mut filter = ResourceFilter::for_user(owner);
        filter.skip = 1;
        filter.limit = 2;

        let page = store.list(&filter).await.unwrap();
        let names: Vec<_> = page.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["item-1", "item-2"]);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_but_keeps_row() {
        let store = MemoryResourceStore::new();
        let created = store
            .insert(Uuid::new_v4(), NewResource::named("Docs"))
            .await
            .unwrap();

        store.soft_delete(created.id).await.unwrap();

        assert!(store.find_active(created.id).await.unwrap().is_none());
        let raw = store.find_any(created.id).await.unwrap().unwrap();
        assert!(raw.deleted_at.is_some());

        assert!(matches!(
            store.soft_delete(created.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_hard_delete_removes_row() {
        let store = MemoryResourceStore::new();
        let created = store
            .insert(Uuid::new_v4(), NewResource::named("Docs"))
            .await
            .unwrap();

        store.hard_delete(created.id).await.unwrap();

        assert!(store.find_any(created.id).await.unwrap().is_none());
        assert!(matches!(
            store.hard_delete(created.id).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
