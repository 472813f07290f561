/// Business services
///
/// - `resource_service`: Owner-scoped CRUD over the resource store

pub mod resource_service;

use uuid::Uuid;

use crate::store::StoreError;

pub use resource_service::{ResourceService, MAX_BULK_RESOURCES};

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Resource is absent or soft-deleted
    #[error("Resource {0} not found")]
    NotFound(Uuid),

    /// Submitted data was rejected
    #[error("{0}")]
    Validation(String),

    /// Bulk request larger than the allowed batch
    #[error("Maximum {max} resources per bulk operation")]
    BatchSizeExceeded { max: usize, actual: usize },

    /// Store failure unrelated to the submitted data
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Constraint(msg) => ServiceError::Validation(msg),
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Store(other),
        }
    }
}
