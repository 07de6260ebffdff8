//! Storage paths for uploaded images.
//!
//! Uploaded files never keep their original name: each upload is stored as
//! `uploads/<kind>/<uuid><.ext>` where the uuid is generated per call.

use std::ffi::OsStr;
use std::fmt::Display;
use std::path::Path;

use uuid::Uuid;

/// Which record an uploaded image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Product,
    User,
}

impl UploadKind {
    /// Directory below `uploads/` holding images of this kind.
    pub const fn dir(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::User => "user",
        }
    }
}

/// Returns a fresh storage path for an uploaded file named `filename`.
pub fn generate_image_path(kind: UploadKind, filename: &str) -> String {
    image_path_with_id(kind, Uuid::new_v4(), filename)
}

/// Shorthand for [`generate_image_path`] with [`UploadKind::Product`].
pub fn generate_product_image_path(filename: &str) -> String {
    generate_image_path(UploadKind::Product, filename)
}

/// Builds the storage path for `filename` using an explicit `id`.
///
/// The original extension is kept verbatim, dot included; a name without an
/// extension yields a path without one.
pub fn image_path_with_id(kind: UploadKind, id: impl Display, filename: &str) -> String {
    match file_extension(filename) {
        Some(ext) => format!("uploads/{}/{id}.{ext}", kind.dir()),
        None => format!("uploads/{}/{id}", kind.dir()),
    }
}

/// Extension of `filename` without the leading dot, if any.
pub fn file_extension(filename: &str) -> Option<&str> {
    Path::new(filename).extension().and_then(OsStr::to_str)
}
