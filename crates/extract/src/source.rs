use std::path::{Path, PathBuf};

use crate::error::ExtractError;

/// A scanned page read from disk, ready for upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

/// Read every supported image directly inside `dir`, sorted by file name.
///
/// Directory iteration order is filesystem-dependent; sorting keeps the page
/// order of the request reproducible.
pub async fn collect_images(dir: &Path) -> Result<Vec<ImageFile>, ExtractError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ExtractError::io(dir, e))?;

    let mut candidates = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| ExtractError::io(dir, e))? {
        let path = entry.path();
        let file_type = entry.file_type().await.map_err(|e| ExtractError::io(&path, e))?;
        if !file_type.is_file() {
            continue;
        }
        let Some(mime_type) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_for_extension)
        else {
            tracing::debug!("Skipping non-image file {}", path.display());
            continue;
        };
        let file_name = entry.file_name().to_string_lossy().into_owned();
        candidates.push((file_name, path, mime_type));
    }

    if candidates.is_empty() {
        return Err(ExtractError::NoImages { dir: dir.to_path_buf() });
    }

    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    let mut images = Vec::with_capacity(candidates.len());
    for (file_name, path, mime_type) in candidates {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| ExtractError::io(&path, e))?;
        images.push(ImageFile { path, file_name, mime_type, bytes });
    }
    Ok(images)
}
