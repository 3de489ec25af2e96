//! Sliding-window quantile (rank) filter over a disk footprint.
//!
//! Samples are binned into discrete levels and kept in a two-level
//! histogram (coarse blocks over fine bins). Moving the window one column
//! only removes the disk's trailing edge and adds its leading edge, so each
//! step costs O(radius) updates plus an O(sqrt(levels)) rank lookup instead
//! of rebuilding the neighbourhood.

use ndarray::Array2;

use crate::consts::{EPSILON, FLOAT_QUANTILE_LEVELS};
use crate::footprint::Disk;
use crate::image::Image;

/// Mapping between sample values and histogram bins.
#[derive(Clone, Copy, Debug)]
struct Levels {
    lo: f32,
    step: f32,
    count: usize,
}

impl Levels {
    /// Integer images get one bin per value between their min and max.
    /// Float images are quantized into `FLOAT_QUANTILE_LEVELS` levels.
    fn for_image(image: &Image) -> Self {
        let (lo, hi) = image.min_max().unwrap_or((0.0, 0.0));
        let span = hi - lo;
        if image.sample_type.is_integer() {
            let lo = lo.round();
            Self {
                lo,
                step: 1.0,
                count: (hi.round() - lo) as usize + 1,
            }
        } else if span < EPSILON {
            Self {
                lo,
                step: 1.0,
                count: 1,
            }
        } else {
            Self {
                lo,
                step: span / (FLOAT_QUANTILE_LEVELS - 1) as f32,
                count: FLOAT_QUANTILE_LEVELS,
            }
        }
    }

    fn bin(&self, v: f32) -> u32 {
        let b = ((v - self.lo) / self.step).round();
        b.clamp(0.0, (self.count - 1) as f32) as u32
    }

    fn value(&self, bin: usize) -> f32 {
        self.lo + bin as f32 * self.step
    }
}

/// Two-level histogram supporting O(1) insert/remove and fast k-th lookup.
#[derive(Clone, Debug)]
pub(crate) struct RankHistogram {
    fine: Vec<u32>,
    coarse: Vec<u32>,
    block: usize,
    total: u32,
}

impl RankHistogram {
    pub(crate) fn new(levels: usize) -> Self {
        let levels = levels.max(1);
        let block = ((levels as f64).sqrt().ceil() as usize).max(1);
        Self {
            fine: vec![0; levels],
            coarse: vec![0; levels.div_ceil(block)],
            block,
            total: 0,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.fine.fill(0);
        self.coarse.fill(0);
        self.total = 0;
    }

    pub(crate) fn add(&mut self, bin: usize) {
        self.fine[bin] += 1;
        self.coarse[bin / self.block] += 1;
        self.total += 1;
    }

    pub(crate) fn remove(&mut self, bin: usize) {
        self.fine[bin] -= 1;
        self.coarse[bin / self.block] -= 1;
        self.total -= 1;
    }

    #[cfg(test)]
    pub(crate) fn total(&self) -> u32 {
        self.total
    }

    /// Bin holding the k-th smallest sample (1-based). `k` must be in 1..=total.
    pub(crate) fn kth(&self, k: u32) -> usize {
        let mut seen = 0u32;
        for (c, &count) in self.coarse.iter().enumerate() {
            if seen + count >= k {
                let start = c * self.block;
                let end = (start + self.block).min(self.fine.len());
                for bin in start..end {
                    seen += self.fine[bin];
                    if seen >= k {
                        return bin;
                    }
                }
            }
            seen += count;
        }
        self.fine.len() - 1
    }

    /// Bin at `quantile` of the current samples: the k-th smallest with
    /// `k = clamp(ceil(quantile * n), 1, n)`. `None` when empty.
    pub(crate) fn quantile(&self, quantile: f32) -> Option<usize> {
        if self.total == 0 {
            return None;
        }
        let n = self.total as f64;
        let k = ((quantile as f64 * n).ceil() as u32).clamp(1, self.total);
        Some(self.kth(k))
    }
}

/// Per-pixel `quantile` of the samples within a disk of `radius`.
///
/// Only in-image pixels count, and pixels where `exclude` is true are
/// ignored. A pixel whose whole neighbourhood is excluded gets NaN.
pub fn quantile_filter(
    image: &Image,
    radius: usize,
    quantile: f32,
    exclude: Option<&Array2<bool>>,
) -> Array2<f32> {
    let (h, w) = image.dim();
    let mut out = Array2::<f32>::from_elem((h, w), f32::NAN);
    if h == 0 || w == 0 {
        return out;
    }

    let levels = Levels::for_image(image);
    let bins = image.data.mapv(|v| levels.bin(v));
    let usable = |r: usize, c: usize| exclude.map_or(true, |m| !m[[r, c]]);
    let disk_rows: Vec<(isize, usize)> = Disk::new(radius).rows().collect();
    let mut hist = RankHistogram::new(levels.count);

    let to_value = |bin: Option<usize>| bin.map_or(f32::NAN, |b| levels.value(b));

    for row in 0..h {
        hist.clear();
        for &(dy, hw) in &disk_rows {
            let Some(r) = row_in_image(row, dy, h) else {
                continue;
            };
            for c in 0..=hw.min(w - 1) {
                if usable(r, c) {
                    hist.add(bins[[r, c]] as usize);
                }
            }
        }
        out[[row, 0]] = to_value(hist.quantile(quantile));

        for col in 1..w {
            for &(dy, hw) in &disk_rows {
                let Some(r) = row_in_image(row, dy, h) else {
                    continue;
                };
                if col > hw {
                    let c = col - hw - 1;
                    if usable(r, c) {
                        hist.remove(bins[[r, c]] as usize);
                    }
                }
                let c = col + hw;
                if c < w && usable(r, c) {
                    hist.add(bins[[r, c]] as usize);
                }
            }
            out[[row, col]] = to_value(hist.quantile(quantile));
        }
    }

    out
}

fn row_in_image(row: usize, dy: isize, h: usize) -> Option<usize> {
    let r = row as isize + dy;
    (r >= 0 && r < h as isize).then_some(r as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_histogram_kth() {
        let mut hist = RankHistogram::new(100);
        for bin in [5, 90, 17, 17, 42] {
            hist.add(bin);
        }
        assert_eq!(hist.total(), 5);
        assert_eq!(hist.kth(1), 5);
        assert_eq!(hist.kth(2), 17);
        assert_eq!(hist.kth(3), 17);
        assert_eq!(hist.kth(4), 42);
        assert_eq!(hist.kth(5), 90);
    }

    #[test]
    fn test_rank_histogram_remove_and_quantile() {
        let mut hist = RankHistogram::new(16);
        for bin in 0..10 {
            hist.add(bin);
        }
        hist.remove(0);
        hist.remove(1);
        // Remaining 2..=9: 8 samples.
        assert_eq!(hist.quantile(0.0), Some(2));
        assert_eq!(hist.quantile(0.5), Some(5));
        assert_eq!(hist.quantile(1.0), Some(9));
    }

    #[test]
    fn test_rank_histogram_empty() {
        let mut hist = RankHistogram::new(8);
        assert_eq!(hist.quantile(0.5), None);
        hist.add(3);
        hist.clear();
        assert_eq!(hist.total(), 0);
        assert_eq!(hist.quantile(0.5), None);
    }

    #[test]
    fn test_levels_integer_is_exact() {
        let data = Array2::from_shape_vec((1, 3), vec![10.0, 12.0, 15.0]).unwrap();
        let image = Image::new(data, crate::image::SampleType::U16);
        let levels = Levels::for_image(&image);
        assert_eq!(levels.count, 6);
        assert_eq!(levels.bin(12.0), 2);
        assert_eq!(levels.value(5), 15.0);
    }
}
