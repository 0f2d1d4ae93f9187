//! Ownership gate for mutating operations.

use uuid::Uuid;

use crate::error::DomainError;

/// Allow the mutation iff the requester owns the resource.
pub fn ensure_owner(requester: Uuid, owner: Uuid, denied: &str) -> Result<(), DomainError> {
    if requester == owner {
        Ok(())
    } else {
        tracing::warn!(%requester, %owner, "Ownership check failed");
        Err(DomainError::Forbidden(denied.to_string()))
    }
}
