//! Local files backing a tracked resource

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::sync::error::StoreError;

/// Read the version marker at `path`
///
/// Returns the trimmed contents. Missing, unreadable or blank files yield
/// `None`; the caller treats that as "no local version".
pub async fn read_version(path: &Path) -> Option<String> {
    match fs::read_to_string(path).await {
        Ok(contents) => {
            let version = contents.trim();
            if version.is_empty() {
                debug!("Version marker {:?} is empty", path);
                None
            } else {
                Some(version.to_string())
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No version marker at {:?}", path);
            None
        }
        Err(e) => {
            warn!("Failed to read version marker {:?}: {}", path, e);
            None
        }
    }
}

/// Replace `path` with `content`
///
/// Writes a sibling temp file and renames it over the target so readers
/// never observe a truncated file. Parent directories are created as needed.
pub async fn write_atomic(path: &Path, content: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(|e| io_error(parent, e))?;
    }

    let temp_path = temp_path_for(path);
    if let Err(e) = fs::write(&temp_path, content).await {
        remove_temp(&temp_path).await;
        return Err(io_error(&temp_path, e));
    }

    if let Err(e) = fs::rename(&temp_path, path).await {
        remove_temp(&temp_path).await;
        return Err(io_error(path, e));
    }

    debug!("Wrote {} bytes to {:?}", content.len(), path);
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("resource"));
    name.push(".tmp");
    path.with_file_name(name)
}

async fn remove_temp(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!("Failed to remove temp file {:?}: {}", temp_path, e);
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}
