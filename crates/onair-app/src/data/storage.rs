//! Storage layer for JSON persistence
//!
//! File I/O helpers shared by everything that persists state.

use crate::config::app::NAME;
use crate::error::{AppError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// Get the application config directory path
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir().map(|p| p.join(NAME)).ok_or_else(|| {
        AppError::Config(
            "Could not determine config directory. HOME environment variable may not be set."
                .to_string(),
        )
    })
}

/// Get path to a specific data file in the default config directory
pub fn data_path(filename: &str) -> Result<PathBuf> {
    Ok(config_dir()?.join(filename))
}

fn storage_error(action: &str, path: &Path, e: &io::Error) -> AppError {
    let msg = match e.kind() {
        ErrorKind::PermissionDenied => format!("Permission denied: cannot {action} {:?}", path),
        ErrorKind::NotFound => format!("Cannot {action} {:?}: parent path does not exist", path),
        ErrorKind::ReadOnlyFilesystem => {
            format!("Cannot {action} {:?}: filesystem is read-only", path)
        }
        _ => format!("Failed to {action} {:?}: {}", path, e),
    };
    AppError::Storage(msg)
}

/// Load data from a JSON file at a specific path
///
/// Returns `None` if the file doesn't exist or is empty.
/// Returns an error if the file exists but can't be read or parsed.
pub fn load_from<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(storage_error("read", path, &e)),
    };

    if content.trim().is_empty() {
        return Ok(None);
    }

    let data = serde_json::from_str(&content)
        .map_err(|e| AppError::Storage(format!("Failed to parse {:?}: {}", path, e)))?;
    Ok(Some(data))
}

/// Save data to a JSON file at a specific path
///
/// Creates parent directories if they don't exist. The file is written to a
/// sibling temp file first and renamed into place.
pub fn save_to<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| storage_error("create directory", parent, &e))?;
        }
    }

    let content = serde_json::to_string_pretty(data)
        .map_err(|e| AppError::Storage(format!("Failed to serialize data: {}", e)))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content).map_err(|e| storage_error("write to", &tmp, &e))?;
    fs::rename(&tmp, path).map_err(|e| storage_error("replace", path, &e))
}
