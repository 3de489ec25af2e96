/// Number of histogram bins for Otsu's thresholding of float images.
pub const OTSU_HISTOGRAM_BINS: usize = 256;

/// Maximum number of histogram bins for Otsu's thresholding of integer images.
/// Integer bins widen so the count stays at or below this.
pub const OTSU_MAX_INTEGER_BINS: usize = 4096;

/// Number of quantization levels for the rank filter on float images.
pub const FLOAT_QUANTILE_LEVELS: usize = 4096;

/// Default radius (pixels) of the illumination quantile window.
pub const DEFAULT_ILLUMINATION_RADIUS: usize = 51;

/// Default quantile used to estimate background illumination.
pub const DEFAULT_ILLUMINATION_QUANTILE: f32 = 0.05;

/// Low/high fractions used when a float channel image must be squeezed
/// into 8 bits for writing.
pub const CHANNEL_FALLBACK_STRETCH: (f32, f32) = (0.05, 0.95);

/// Number of single-channel images glued into one channel image.
pub const CHANNELS_PER_GROUP: usize = 3;

/// Number of tiles composing one stitched field.
pub const QUADRANTS_PER_FIELD: usize = 4;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f32 = 1e-10;

/// Default suffix of per-image artifact mask files.
pub const DEFAULT_MASK_SUFFIX: &str = ".mask.tif";

/// Default suffix of illumination-corrected images.
pub const DEFAULT_ILLUM_SUFFIX: &str = ".illum.tif";

/// Default suffix of cropped images.
pub const DEFAULT_CROP_SUFFIX: &str = ".crop.tif";

/// Suffix of channel-concatenated images.
pub const CHANNELS_SUFFIX: &str = ".chs.tif";

/// Suffix appended to the group key of stitched composites.
pub const STITCHED_SUFFIX: &str = "_stitched.tif";
