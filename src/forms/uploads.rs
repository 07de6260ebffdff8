use std::io::{Read, Seek, SeekFrom};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use thiserror::Error;

use crate::domain::image::file_extension;

/// Extensions accepted for uploaded images.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Multipart body with a single `image` file field.
///
/// The size cap comes from the `MultipartFormConfig` registered by the app
/// (`max_upload_size`).
#[derive(MultipartForm)]
pub struct ImageUploadForm {
    pub image: TempFile,
}

/// An uploaded image read into memory and checked to look like an image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    /// Name the client gave the file; only its extension is kept.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageUploadFormError {
    #[error("Upload a valid image. The file name is missing.")]
    MissingFileName,
    #[error("The submitted file is empty.")]
    EmptyFile,
    #[error("File extension '{0}' is not allowed.")]
    UnsupportedExtension(String),
    #[error("Upload a valid image. The file you uploaded was either not an image or a corrupted image.")]
    NotAnImage,
    #[error("Error reading uploaded file")]
    FileReadError,
}

impl From<std::io::Error> for ImageUploadFormError {
    fn from(_: std::io::Error) -> Self {
        ImageUploadFormError::FileReadError
    }
}

/// Recognises the magic numbers of the accepted formats.
fn looks_like_image(bytes: &[u8]) -> bool {
    const SIGNATURES: &[&[u8]] = &[
        b"\xFF\xD8\xFF",
        b"\x89PNG\r\n\x1A\n",
        b"GIF87a",
        b"GIF89a",
    ];

    SIGNATURES.iter().any(|sig| bytes.starts_with(sig))
        || (bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP")
}

impl ImageUpload {
    /// Validates name, extension and content of an in-memory upload.
    pub fn new(file_name: String, bytes: Vec<u8>) -> Result<Self, ImageUploadFormError> {
        if file_name.trim().is_empty() {
            return Err(ImageUploadFormError::MissingFileName);
        }
        let extension = file_extension(&file_name)
            .ok_or_else(|| ImageUploadFormError::UnsupportedExtension(String::new()))?;
        if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str()) {
            return Err(ImageUploadFormError::UnsupportedExtension(
                extension.to_string(),
            ));
        }
        if bytes.is_empty() {
            return Err(ImageUploadFormError::EmptyFile);
        }
        if !looks_like_image(&bytes) {
            return Err(ImageUploadFormError::NotAnImage);
        }
        Ok(Self { file_name, bytes })
    }
}

impl TryFrom<ImageUploadForm> for ImageUpload {
    type Error = ImageUploadFormError;

    fn try_from(mut form: ImageUploadForm) -> Result<Self, Self::Error> {
        let file_name = form
            .image
            .file_name
            .take()
            .ok_or(ImageUploadFormError::MissingFileName)?;

        let file = form.image.file.as_file_mut();
        file.seek(SeekFrom::Start(0))?;
        let mut bytes = Vec::with_capacity(form.image.size);
        file.read_to_end(&mut bytes)?;

        Self::new(file_name, bytes)
    }
}
