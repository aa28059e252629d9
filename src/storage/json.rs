//! JSON record files
//!
//! Every durable write in the crate goes through [`write_json`], which writes
//! to a sibling temp file, syncs it and renames it over the target. A crash
//! mid-write leaves either the old or the new complete file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{Result, StudyError};

/// Read and deserialize a JSON file. A missing file surfaces as an
/// [`StudyError::Io`] with kind `NotFound`; malformed content as
/// [`StudyError::CorruptRecord`].
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| StudyError::CorruptRecord {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Serialize `data` with pretty formatting and atomically replace `path`.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(data)?;
    content.push('\n');

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path_for(path);
    if let Err(e) = write_and_sync(&temp_path, content.as_bytes()) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    log::debug!("Wrote {}", path.display());
    Ok(())
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn temp_path_for(path: &Path) -> PathBuf {
    path.with_extension("json.tmp")
}

/// True for leftover temp files from an interrupted write.
pub fn is_temp_file(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".json.tmp")
}
