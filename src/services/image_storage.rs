use crate::error::{AppError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Directory (relative to the media root) holding recipe images.
pub const RECIPE_IMAGE_DIR: &str = "uploads/recipe";

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Builds the storage path for an uploaded recipe image: a fresh UUID
/// keeping the original (lower-cased) extension.
pub fn recipe_image_file_path(filename: &str) -> String {
    let id = uuid::Uuid::new_v4();
    match extension_of(filename) {
        Some(ext) => format!("{}/{}.{}", RECIPE_IMAGE_DIR, id, ext),
        None => format!("{}/{}", RECIPE_IMAGE_DIR, id),
    }
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Sniffs the leading bytes of an upload for a known image signature.
pub fn looks_like_image(bytes: &[u8]) -> bool {
    const SIGNATURES: &[&[u8]] = &[
        b"\xFF\xD8\xFF",        // JPEG
        b"\x89PNG\r\n\x1a\n",   // PNG
        b"GIF87a",
        b"GIF89a",
        b"BM",                  // BMP
    ];

    if SIGNATURES.iter().any(|sig| bytes.starts_with(sig)) {
        return true;
    }

    // WEBP: RIFF....WEBP
    bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP"
}

/// Writes recipe images below a media root directory.
#[derive(Debug, Clone)]
pub struct ImageStorage {
    root: PathBuf,
}

impl ImageStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Validates and stores an upload, returning its path relative to the media root.
    pub async fn save_recipe_image(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Err(AppError::validation("image", "The submitted file is empty."));
        }

        match extension_of(filename) {
            Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
            _ => {
                return Err(AppError::validation(
                    "image",
                    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
                ))
            }
        }

        if !looks_like_image(bytes) {
            return Err(AppError::validation(
                "image",
                "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
            ));
        }

        let relative = recipe_image_file_path(filename);
        let full_path = self.root.join(&relative);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&full_path, bytes).await?;

        tracing::debug!(path = %full_path.display(), size = bytes.len(), "Stored recipe image");

        Ok(relative)
    }

    /// Removes a previously stored file. Missing files are ignored.
    pub async fn remove(&self, relative: &str) -> Result<()> {
        let full_path = self.root.join(relative);
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    #[cfg(test)]
    pub(crate) fn exists(&self, relative: &str) -> bool {
        self.root.join(relative).is_file()
    }
}
