#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ndarray::Array2;

use screenprep_core::error::{PrepError, Result};
use screenprep_core::image::{ChannelImage, Image, SampleType};
use screenprep_core::io::ImageStore;
use screenprep_core::mask::ArtifactMask;

/// In-memory image store keyed by path.
#[derive(Default)]
pub struct MemoryStore {
    images: Mutex<HashMap<PathBuf, Image>>,
    masks: Mutex<HashMap<PathBuf, ArtifactMask>>,
    channels: Mutex<HashMap<PathBuf, ChannelImage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, image: Image) {
        self.images.lock().unwrap().insert(path.into(), image);
    }

    pub fn insert_mask(&self, path: impl Into<PathBuf>, mask: ArtifactMask) {
        self.masks.lock().unwrap().insert(path.into(), mask);
    }

    pub fn image(&self, path: impl AsRef<Path>) -> Option<Image> {
        self.images.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub fn mask(&self, path: impl AsRef<Path>) -> Option<ArtifactMask> {
        self.masks.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub fn channel_image(&self, path: impl AsRef<Path>) -> Option<ChannelImage> {
        self.channels.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub fn mask_count(&self) -> usize {
        self.masks.lock().unwrap().len()
    }
}

fn not_found(path: &Path) -> PrepError {
    PrepError::io(
        path,
        std::io::Error::new(std::io::ErrorKind::NotFound, "not in store"),
    )
}

impl ImageStore for MemoryStore {
    fn read(&self, path: &Path) -> Result<Image> {
        self.image(path).ok_or_else(|| not_found(path))
    }

    fn write(&self, path: &Path, image: &Image) -> Result<()> {
        self.insert(path, image.clone());
        Ok(())
    }

    fn read_mask(&self, path: &Path) -> Result<ArtifactMask> {
        self.mask(path).ok_or_else(|| not_found(path))
    }

    fn write_mask(&self, path: &Path, mask: &ArtifactMask) -> Result<()> {
        self.insert_mask(path, mask.clone());
        Ok(())
    }

    fn write_channels(&self, path: &Path, image: &ChannelImage) -> Result<()> {
        self.channels
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), image.clone());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.images.lock().unwrap().contains_key(path) || self.masks.lock().unwrap().contains_key(path)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.images.lock().unwrap().remove(path);
        self.masks.lock().unwrap().remove(path);
        Ok(())
    }
}

pub fn constant(h: usize, w: usize, value: f32, sample_type: SampleType) -> Image {
    Image::new(Array2::from_elem((h, w), value), sample_type)
}

/// 8-bit image with a bright square `[top..top+size, left..left+size]`.
pub fn spot_image(h: usize, w: usize, top: usize, left: usize, size: usize) -> Image {
    let data = Array2::from_shape_fn((h, w), |(r, c)| {
        let inside = (top..top + size).contains(&r) && (left..left + size).contains(&c);
        if inside {
            200.0
        } else {
            10.0
        }
    });
    Image::new(data, SampleType::U8)
}

/// Deterministic pseudo-random 8-bit image (linear congruential generator).
pub fn noise_image(h: usize, w: usize, seed: u64) -> Image {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let data = Array2::from_shape_fn((h, w), |_| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) % 256) as f32
    });
    Image::new(data, SampleType::U8)
}

/// Smooth vignetting profile peaking at the center, scaled to `peak`.
pub fn vignette(h: usize, w: usize, peak: f32) -> Array2<f32> {
    let (cy, cx) = ((h as f32 - 1.0) / 2.0, (w as f32 - 1.0) / 2.0);
    let rmax = (cy * cy + cx * cx).sqrt().max(1.0);
    Array2::from_shape_fn((h, w), |(r, c)| {
        let d = ((r as f32 - cy).powi(2) + (c as f32 - cx).powi(2)).sqrt() / rmax;
        peak * (1.0 - 0.5 * d * d)
    })
}
