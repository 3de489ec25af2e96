pub mod cat;
pub mod config;
pub mod crop;
pub mod features;
pub mod illum;
pub mod mask;
pub mod stitch;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use screenprep_core::batch::PrepConfig;
use screenprep_core::io::paths::read_file_list;
use tracing::debug;

/// Load a TOML config, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<PrepConfig> {
    let Some(path) = path else {
        return Ok(PrepConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: PrepConfig = toml::from_str(&contents)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    debug!(path = %path.display(), "Config loaded");
    Ok(config)
}

/// Positional images followed by those listed in `file_list`.
pub fn collect_inputs(images: &[PathBuf], file_list: Option<&Path>) -> Result<Vec<PathBuf>> {
    let mut paths = images.to_vec();
    if let Some(list) = file_list {
        paths.extend(
            read_file_list(list)
                .with_context(|| format!("Failed to read file list {}", list.display()))?,
        );
    }
    if paths.is_empty() {
        bail!("No input images given");
    }
    Ok(paths)
}
