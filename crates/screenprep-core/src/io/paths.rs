use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PrepError, Result};

/// Path without its final extension: `plate/a01.tif` → `plate/a01`.
pub fn base_name(path: &Path) -> PathBuf {
    path.with_extension("")
}

/// Base name with `suffix` appended: (`a01.tif`, `.illum.tif`) → `a01.illum.tif`.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = base_name(path).into_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Move `path` into `dir`, keeping its file name. `None` keeps it in place.
pub fn in_dir(path: &Path, dir: Option<&Path>) -> PathBuf {
    match (dir, path.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// Read a list of image paths, one per line. Blank lines are skipped.
pub fn read_file_list(path: &Path) -> Result<Vec<PathBuf>> {
    let contents = fs::read_to_string(path).map_err(|e| PrepError::io(path, e))?;
    Ok(contents
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}
