/// Ownership checks
///
/// Every resource has exactly one owner. Reads and writes through the API are
/// allowed only for that owner; these helpers perform the comparison so the
/// handlers never compare IDs inline.
///
/// # Example
///
/// ```
/// use resourcekit_shared::auth::authorization::require_owner;
/// use resourcekit_shared::auth::middleware::AuthContext;
/// use resourcekit_shared::models::Resource;
///
/// fn check(auth: &AuthContext, resource: &Resource) -> bool {
///     require_owner(auth, resource).is_ok()
/// }
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;
use crate::models::Resource;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller is not the owner of the resource
    #[error("Not authorized to access resource {resource_id}")]
    NotOwner { resource_id: Uuid },
}

/// Checks that the caller owns `resource`
pub fn require_owner(auth: &AuthContext, resource: &Resource) -> Result<(), AuthzError> {
    if !resource.is_owned_by(auth.user_id) {
        return Err(AuthzError::NotOwner {
            resource_id: resource.id,
        });
    }

    Ok(())
}
