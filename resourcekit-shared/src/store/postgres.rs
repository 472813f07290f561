/// PostgreSQL resource store
///
/// Every call checks a connection out of the pool for the duration of one
/// statement. `insert_batch` runs inside a transaction; if any insert fails the
/// transaction is dropped and PostgreSQL rolls back the rows already written.
///
/// # Example
///
/// ```no_run
/// use resourcekit_shared::db::pool::{create_pool, DatabaseConfig};
/// use resourcekit_shared::models::NewResource;
/// use resourcekit_shared::store::{postgres::PgResourceStore, ResourceStore};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let store = PgResourceStore::new(pool);
/// let resource = store.insert(Uuid::new_v4(), NewResource::named("Docs")).await?;
/// println!("Created resource {}", resource.id);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tracing::debug;
use uuid::Uuid;

use super::{ResourceStore, StoreError};
use crate::models::{NewResource, Resource, ResourceChanges, ResourceFilter};

const RESOURCE_COLUMNS: &str =
    "id, name, description, status, user_id, created_at, updated_at, deleted_at";

/// `ResourceStore` backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgResourceStore {
    pool: PgPool,
}

impl PgResourceStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Escapes `%`, `_` and `\` so user input is matched literally by ILIKE
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

async fn insert_one<'e, E>(
    executor: E,
    user_id: Uuid,
    data: NewResource,
) -> Result<Resource, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let query = format!(
        "INSERT INTO resources (name, description, status, user_id) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {}",
        RESOURCE_COLUMNS
    );

    sqlx::query_as::<_, Resource>(&query)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.status_or_default().as_str())
        .bind(user_id)
        .fetch_one(executor)
        .await
}

#[async_trait]
impl ResourceStore for PgResourceStore {
    async fn ping(&self) -> Result<(), StoreError> {
        crate::db::pool::health_check(&self.pool).await?;
        Ok(())
    }

    async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, StoreError> {
        let mut query = format!(
            "SELECT {} FROM resources WHERE user_id = $1 AND deleted_at IS NULL",
            RESOURCE_COLUMNS
        );
        let mut bind_count = 1;

        let search = filter.search_term().map(like_pattern);
        if search.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND name ILIKE ${}", bind_count));
        }
        let status = filter.status_term();
        if status.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND status = ${}", bind_count));
        }

        query.push_str(&format!(
            " ORDER BY created_at, id OFFSET ${} LIMIT ${}",
            bind_count + 1,
            bind_count + 2
        ));

        let mut q = sqlx::query_as::<_, Resource>(&query).bind(filter.user_id);
        if let Some(search) = search {
            q = q.bind(search);
        }
        if let Some(status) = status {
            q = q.bind(status);
        }

        let resources = q
            .bind(filter.skip)
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(
            user_id = %filter.user_id,
            count = resources.len(),
            "Listed resources"
        );
        Ok(resources)
    }

    async fn find_active(&self, id: Uuid) -> Result<Option<Resource>, StoreError> {
        let query = format!(
            "SELECT {} FROM resources WHERE id = $1 AND deleted_at IS NULL",
            RESOURCE_COLUMNS
        );

        let resource = sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(resource)
    }

    async fn find_any(&self, id: Uuid) -> Result<Option<Resource>, StoreError> {
        let query = format!("SELECT {} FROM resources WHERE id = $1", RESOURCE_COLUMNS);

        let resource = sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(resource)
    }

    async fn insert(&self, user_id: Uuid, data: NewResource) -> Result<Resource, StoreError> {
        let resource = insert_one(&self.pool, user_id, data).await?;
        debug!(resource_id = %resource.id, user_id = %user_id, "Inserted resource");
        Ok(resource)
    }

    async fn insert_batch(
        &self,
        user_id: Uuid,
        items: Vec<NewResource>,
    ) -> Result<Vec<Resource>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(items.len());

        for data in items {
            // Dropping `tx` on the error path rolls the batch back
            created.push(insert_one(&mut *tx, user_id, data).await?);
        }

        tx.commit().await?;

        debug!(user_id = %user_id, count = created.len(), "Inserted resource batch");
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: &ResourceChanges) -> Result<Resource, StoreError> {
        let mut query = String::from("UPDATE resources SET updated_at = NOW()");
        let mut bind_count = 1;

        if let Some(Some(_)) = &changes.name {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if changes.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if let Some(Some(_)) = changes.status {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }

        query.push_str(&format!(
            " WHERE id = $1 AND deleted_at IS NULL RETURNING {}",
            RESOURCE_COLUMNS
        ));

        let mut q = sqlx::query_as::<_, Resource>(&query).bind(id);

        if let Some(Some(name)) = &changes.name {
            q = q.bind(name);
        }
        if let Some(description) = &changes.description {
            q = q.bind(description);
        }
        if let Some(Some(status)) = changes.status {
            q = q.bind(status.as_str());
        }

        let resource = q
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))?;

        debug!(resource_id = %id, "Updated resource");
        Ok(resource)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE resources SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        debug!(resource_id = %id, "Soft-deleted resource");
        Ok(())
    }

    async fn hard_delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        debug!(resource_id = %id, "Hard-deleted resource");
        Ok(())
    }
}
