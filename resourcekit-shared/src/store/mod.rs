/// Persistence seam for resources
///
/// `ResourceStore` is the only thing the service layer knows about storage.
/// Two backends implement it:
///
/// - [`postgres::PgResourceStore`]: the production store, backed by `sqlx`
/// - [`memory::MemoryResourceStore`]: an in-process store that enforces the
///   same column constraints as the `resources` table
///
/// # Contract
///
/// - `find_active` and `list` never return soft-deleted rows
/// - `find_any` is raw inspection and does return soft-deleted rows
/// - `insert_batch` is all-or-nothing: on error no row of the batch remains
/// - `update`, `soft_delete` and `hard_delete` report `StoreError::NotFound`
///   when the target row is gone (or already soft-deleted)
/// - Constraint violations surface as `StoreError::Constraint`
///
/// # Example
///
/// ```
/// use resourcekit_shared::models::{NewResource, ResourceFilter};
/// use resourcekit_shared::store::{memory::MemoryResourceStore, ResourceStore};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), resourcekit_shared::store::StoreError> {
/// let store = MemoryResourceStore::new();
/// let owner = Uuid::new_v4();
///
/// let created = store.insert(owner, NewResource::named("Docs")).await?;
/// let page = store.list(&ResourceFilter::for_user(owner)).await?;
/// assert_eq!(page, vec![created]);
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

pub use memory::MemoryResourceStore;
pub use postgres::PgResourceStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{NewResource, Resource, ResourceChanges, ResourceFilter};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A column constraint or data check rejected the write
    #[error("{0}")]
    Constraint(String),

    /// The target row does not exist (or is soft-deleted)
    #[error("Resource {0} not found")]
    NotFound(Uuid),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    /// Returns true for errors caused by the submitted data
    pub fn is_constraint(&self) -> bool {
        matches!(self, StoreError::Constraint(_))
    }
}

/// SQLSTATE classes that mean "the submitted value is invalid"
///
/// - `22`: data exception (e.g. value too long)
/// - `23`: integrity constraint violation (not null, check, unique, foreign key)
const CONSTRAINT_SQLSTATE_CLASSES: [&str; 2] = ["22", "23"];

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let is_constraint = db_err
                .code()
                .map(|code| {
                    CONSTRAINT_SQLSTATE_CLASSES
                        .iter()
                        .any(|class| code.starts_with(class))
                })
                .unwrap_or(false);

            if is_constraint {
                return StoreError::Constraint(db_err.message().to_string());
            }
        }

        StoreError::Database(err)
    }
}

/// Storage backend for resources
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Verifies the backend is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    /// Lists live resources matching `filter`, applying `skip`/`limit`
    async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, StoreError>;

    /// Finds a live (not soft-deleted) resource by ID, whoever owns it
    async fn find_active(&self, id: Uuid) -> Result<Option<Resource>, StoreError>;

    /// Finds a resource by ID including soft-deleted rows
    async fn find_any(&self, id: Uuid) -> Result<Option<Resource>, StoreError>;

    /// Inserts one resource owned by `user_id`
    async fn insert(&self, user_id: Uuid, data: NewResource) -> Result<Resource, StoreError>;

    /// Inserts every item or none of them
    async fn insert_batch(
        &self,
        user_id: Uuid,
        items: Vec<NewResource>,
    ) -> Result<Vec<Resource>, StoreError>;

    /// Applies the supplied fields of `changes` to a live resource
    async fn update(&self, id: Uuid, changes: &ResourceChanges) -> Result<Resource, StoreError>;

    /// Sets `deleted_at` on a live resource
    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Physically removes a resource
    async fn hard_delete(&self, id: Uuid) -> Result<(), StoreError>;
}
