use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::error::ScanError;
use crate::record::ImageRecord;

const SUPPORTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Returns true when the file name looks like an image the catalog accepts.
pub fn is_supported_image(path: &Path) -> bool {
    mime_guess::from_path(path)
        .iter()
        .any(|mime| SUPPORTED_MIME_TYPES.contains(&mime.essence_str()))
}

/// Reads the given inputs into image records.
///
/// Files are taken as-is, whatever their extension. Directories contribute
/// their top-level JPEG, PNG and WebP files.
pub fn collect_images<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<ImageRecord>, ScanError> {
    let mut paths: Vec<PathBuf> = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        if input.is_dir() {
            paths.extend(scan_directory(input)?);
        } else if input.is_file() {
            paths.push(input.to_path_buf());
        } else {
            return Err(ScanError::NotFound(input.to_path_buf()));
        }
    }

    let records = paths
        .into_iter()
        .map(|path| read_record(&path))
        .collect::<Result<Vec<_>, _>>()?;

    info!("Collected {} images", records.len());
    Ok(records)
}

fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut found = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ScanError::Walk {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();

        if entry.file_type().is_file() && is_supported_image(path) {
            debug!("Found image: {}", path.display());
            found.push(path.to_path_buf());
        }
    }

    Ok(found)
}

fn read_record(path: &Path) -> Result<ImageRecord, ScanError> {
    let raw_bytes = std::fs::read(path).map_err(|e| ScanError::ReadImage {
        path: path.to_path_buf(),
        source: e,
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());

    Ok(ImageRecord::new(name, raw_bytes))
}
