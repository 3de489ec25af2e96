use ndarray::Array2;

use crate::footprint::Disk;

/// Binary dilation with a disk of `radius`: a pixel becomes true if ANY
/// in-image pixel under the disk is true. Radius 0 is the identity.
pub fn dilate(mask: &Array2<bool>, radius: usize) -> Array2<bool> {
    if radius == 0 {
        return mask.clone();
    }
    let (h, w) = mask.dim();
    let disk = Disk::new(radius);

    // Per-row prefix counts: prefix[[row, c]] = number of true pixels in row[..c].
    let mut prefix = Array2::<u32>::zeros((h, w + 1));
    for row in 0..h {
        for col in 0..w {
            prefix[[row, col + 1]] = prefix[[row, col]] + mask[[row, col]] as u32;
        }
    }

    Array2::from_shape_fn((h, w), |(row, col)| {
        disk.rows().any(|(dy, hw)| {
            let r = row as isize + dy;
            if r < 0 || r >= h as isize {
                return false;
            }
            let r = r as usize;
            let c0 = col.saturating_sub(hw);
            let c1 = (col + hw).min(w - 1);
            prefix[[r, c1 + 1]] > prefix[[r, c0]]
        })
    })
}

/// Binary erosion with a disk of `radius`: a pixel stays true only if ALL
/// in-image pixels under the disk are true. Pixels outside the image do not
/// erode, so regions touching the border are not eaten from outside.
/// Radius 0 is the identity.
pub fn erode(mask: &Array2<bool>, radius: usize) -> Array2<bool> {
    if radius == 0 {
        return mask.clone();
    }
    let inverted = mask.mapv(|v| !v);
    dilate(&inverted, radius).mapv(|v| !v)
}

/// Morphological closing (dilation followed by erosion) with a disk of `radius`.
///
/// Fills gaps narrower than the disk and smooths region boundaries. The
/// result always contains the input. Radius 0 is the identity.
pub fn closing(mask: &Array2<bool>, radius: usize) -> Array2<bool> {
    let dilated = dilate(mask, radius);
    erode(&dilated, radius)
}
