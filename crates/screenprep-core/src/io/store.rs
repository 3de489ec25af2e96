use std::path::Path;

use crate::error::{PrepError, Result};
use crate::image::{ChannelImage, Image};
use crate::mask::ArtifactMask;

use super::image_io;

/// Image I/O collaborator used by the batch layer.
///
/// Implementors decide where images live; the processing code only sees
/// paths. Errors must name the offending path.
pub trait ImageStore: Send + Sync {
    fn read(&self, path: &Path) -> Result<Image>;

    fn write(&self, path: &Path, image: &Image) -> Result<()>;

    fn read_mask(&self, path: &Path) -> Result<ArtifactMask>;

    fn write_mask(&self, path: &Path, mask: &ArtifactMask) -> Result<()>;

    fn write_channels(&self, path: &Path, image: &ChannelImage) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Delete a previously written image or mask. Removing a path that does
    /// not exist succeeds.
    fn remove(&self, path: &Path) -> Result<()>;
}

/// Filesystem store backed by the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsImageStore;

impl ImageStore for FsImageStore {
    fn read(&self, path: &Path) -> Result<Image> {
        image_io::load_image(path)
    }

    fn write(&self, path: &Path, image: &Image) -> Result<()> {
        image_io::save_image(image, path)
    }

    fn read_mask(&self, path: &Path) -> Result<ArtifactMask> {
        image_io::load_mask(path)
    }

    fn write_mask(&self, path: &Path, mask: &ArtifactMask) -> Result<()> {
        image_io::save_mask(mask, path)
    }

    fn write_channels(&self, path: &Path, image: &ChannelImage) -> Result<()> {
        image_io::save_channel_image(image, path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn remove(&self, path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PrepError::io(path, e)),
        }
    }
}
