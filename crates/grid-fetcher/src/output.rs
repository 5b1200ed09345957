use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::OutputError;
use crate::types::Grid;

/// Writes `grid` as pretty-printed JSON.
///
/// The document is written to a sibling temporary file and renamed over `path`, so readers observe either
/// the previous file or the complete new one.
pub fn write_grid_json(path: &Path, grid: &Grid) -> Result<(), OutputError> {
    let mut encoded = serde_json::to_vec_pretty(grid)?;
    encoded.push(b'\n');

    let tmp_path = temp_path(path);
    let result = write_then_rename(&tmp_path, path, &encoded);
    if result.is_err() && tmp_path.exists() {
        if let Err(e) = fs::remove_file(&tmp_path) {
            log::warn!("Failed to remove {}: {}", tmp_path.display(), e);
        }
    }
    result
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_then_rename(tmp_path: &Path, path: &Path, bytes: &[u8]) -> Result<(), OutputError> {
    let io_error = |source: std::io::Error| OutputError::Io { path: path.to_path_buf(), source };

    let mut file = File::create(tmp_path).map_err(io_error)?;
    file.write_all(bytes).and_then(|_| file.sync_all()).map_err(io_error)?;
    fs::rename(tmp_path, path).map_err(io_error)
}
