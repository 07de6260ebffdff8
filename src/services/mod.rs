//! Business operations behind the HTTP routes.
//!
//! Services validate permissions, talk to repositories through the reader and
//! writer traits and translate failures into [`ServiceError`], so routes stay
//! thin wrappers.

pub mod categories;
pub mod errors;
pub mod products;
pub mod properties;
pub mod users;

pub use errors::{ServiceError, ServiceResult};

use crate::domain::auth::AuthenticatedUser;
use crate::storage::ImageStorage;

/// Catalog edits are reserved to staff accounts.
pub(crate) fn ensure_staff(user: &AuthenticatedUser) -> ServiceResult<()> {
    if user.is_staff {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Removes an upload whose database row could not be updated.
pub(crate) fn discard_upload<S: ImageStorage>(storage: &S, path: &str) {
    if let Err(e) = storage.remove(path) {
        log::warn!("Failed to remove orphaned upload {path}: {e}");
    }
}
