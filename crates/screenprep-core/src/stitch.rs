//! Quadrant stitching: four same-shape tiles become one composite of twice
//! the height and width, by plain concatenation.

use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

use crate::consts::QUADRANTS_PER_FIELD;
use crate::error::{check_shape, PrepError, Result};
use crate::image::Image;

/// Position of a tile within a 2x2 field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// Traversal order of tiles within one group.
    pub const ORDER: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// Position in [`Quadrant::ORDER`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// `(row, col)` block of this quadrant, each 0 or 1.
    pub fn block(self) -> (usize, usize) {
        let i = self.index();
        (i / 2, i % 2)
    }

    /// Acquisition site numbering: s1..s4 in traversal order.
    pub fn from_site(site: u8) -> Option<Self> {
        match site {
            1..=4 => Some(Self::ORDER[site as usize - 1]),
            _ => None,
        }
    }
}

/// An image tagged with its quadrant.
#[derive(Clone, Debug)]
pub struct Tile {
    pub image: Image,
    pub quadrant: Quadrant,
}

/// Stitch a flat sequence of tiles, four per field in [`Quadrant::ORDER`].
///
/// Returns one composite per group, in input order. An empty slice is an
/// error, not an empty result.
pub fn stitch_quadrants(tiles: &[Image]) -> Result<Vec<Image>> {
    if tiles.is_empty() {
        return Err(PrepError::EmptyInput("stitch tiles"));
    }
    if tiles.len() % QUADRANTS_PER_FIELD != 0 {
        return Err(PrepError::parameter(format!(
            "quadrant stitching needs a multiple of {QUADRANTS_PER_FIELD} tiles, got {}",
            tiles.len()
        )));
    }
    tiles
        .chunks_exact(QUADRANTS_PER_FIELD)
        .map(|group| stitch_group([&group[0], &group[1], &group[2], &group[3]]))
        .collect()
}

/// Stitch one field from tiles tagged with their quadrant, in any order.
/// Each quadrant must appear exactly once.
pub fn stitch_tiles(tiles: Vec<Tile>) -> Result<Image> {
    let mut slots: [Option<Image>; 4] = Default::default();
    for tile in tiles {
        let slot = &mut slots[tile.quadrant.index()];
        if slot.is_some() {
            return Err(PrepError::parameter(format!(
                "quadrant {:?} given more than once",
                tile.quadrant
            )));
        }
        *slot = Some(tile.image);
    }
    let [Some(tl), Some(tr), Some(bl), Some(br)] = slots else {
        return Err(PrepError::parameter("every quadrant needs exactly one tile"));
    };
    stitch_group([&tl, &tr, &bl, &br])
}

/// Stitch four tiles given in [`Quadrant::ORDER`].
pub fn stitch_group(group: [&Image; 4]) -> Result<Image> {
    let first = group[0];
    let (h, w) = first.dim();
    for tile in &group[1..] {
        check_shape((h, w), tile.dim())?;
        if tile.sample_type != first.sample_type {
            return Err(PrepError::SampleTypeMismatch {
                expected: first.sample_type,
                actual: tile.sample_type,
            });
        }
    }

    let mut out = Array2::<f32>::zeros((2 * h, 2 * w));
    for (quadrant, tile) in Quadrant::ORDER.iter().zip(group) {
        let (br, bc) = quadrant.block();
        out.slice_mut(s![br * h..(br + 1) * h, bc * w..(bc + 1) * w])
            .assign(&tile.data);
    }
    Ok(Image::new(out, first.sample_type))
}
