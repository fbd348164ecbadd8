//! Input folder scanning.

use crate::config::SortOrder;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// File extensions treated as images, matched case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "tiff", "webp"];

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("input folder {path} does not exist")]
    MissingFolder { path: PathBuf },

    #[error("failed to read input folder {path}: {source}")]
    ReadFolder {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// List the image files in `dir`, sorted by name or by creation date.
pub fn scan_images(dir: &Path, sort: SortOrder) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::MissingFolder {
            path: dir.to_path_buf(),
        });
    }

    let entries = fs::read_dir(dir).map_err(|source| ScanError::ReadFolder {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ScanError::ReadFolder {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && is_image(&path) {
            files.push(path);
        }
    }

    match sort {
        SortOrder::Name => files.sort_by_key(file_name_key),
        // Name as the secondary key keeps date ordering stable across runs.
        SortOrder::Date => files.sort_by_key(|path| (file_created(path), file_name_key(path))),
    }

    Ok(files)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn file_name_key(path: &PathBuf) -> OsString {
    path.file_name().map(OsString::from).unwrap_or_default()
}

/// Creation time where the platform reports it, modification time otherwise.
fn file_created(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|meta| meta.created().or_else(|_| meta.modified()))
        .unwrap_or(SystemTime::UNIX_EPOCH)
}
