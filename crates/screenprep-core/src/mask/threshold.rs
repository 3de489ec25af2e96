use crate::consts::{OTSU_HISTOGRAM_BINS, OTSU_MAX_INTEGER_BINS};
use crate::image::Image;

/// Otsu's thresholding over the image's own value range.
///
/// Returns the largest value of the background class, in sample units:
/// pixels strictly above it belong to the bright class. A constant image
/// yields its only value, so nothing lies above the threshold.
pub fn otsu_threshold(image: &Image) -> f32 {
    let Some((lo, hi)) = image.min_max() else {
        return 0.0;
    };
    if hi <= lo {
        return hi;
    }

    let integer = image.sample_type.is_integer();
    let (bins, width) = if integer {
        // Integer-width bins so every bin holds whole sample values.
        let span = (hi - lo) as f64 + 1.0;
        let width = (span / OTSU_MAX_INTEGER_BINS as f64).ceil().max(1.0);
        ((span / width).ceil() as usize, width)
    } else {
        (
            OTSU_HISTOGRAM_BINS,
            (hi - lo) as f64 / OTSU_HISTOGRAM_BINS as f64,
        )
    };

    let mut histogram = vec![0u64; bins];
    for &v in image.data.iter().filter(|v| !v.is_nan()) {
        let bin = (((v - lo) as f64 / width) as usize).min(bins - 1);
        histogram[bin] += 1;
    }

    let best_bin = otsu_bin(&histogram);
    let upper_edge = lo as f64 + (best_bin + 1) as f64 * width;
    if integer {
        (upper_edge - 1.0) as f32
    } else {
        upper_edge as f32
    }
}

/// Index of the last background bin maximizing between-class variance.
pub fn otsu_bin(histogram: &[u64]) -> usize {
    let total: f64 = histogram.iter().map(|&c| c as f64).sum();
    let sum_all: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut weight_bg: f64 = 0.0;
    let mut sum_bg: f64 = 0.0;
    let mut best_variance = 0.0_f64;
    let mut best_bin = 0usize;

    for (i, &count) in histogram.iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }
        sum_bg += i as f64 * count as f64;
        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let between_variance = weight_bg * weight_fg * (mean_bg - mean_fg).powi(2);

        if between_variance > best_variance {
            best_variance = between_variance;
            best_bin = i;
        }
    }

    best_bin
}
