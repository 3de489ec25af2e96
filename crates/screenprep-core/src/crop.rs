use std::str::FromStr;

use ndarray::s;
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};
use crate::image::Image;

/// Crop bounds as half-open `[start, stop)` ranges over rows and columns.
///
/// `None` leaves that end open. Negative values count from the end of the
/// axis, and out-of-range values are clamped, like slice indexing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropBounds {
    pub row_start: Option<isize>,
    pub row_stop: Option<isize>,
    pub col_start: Option<isize>,
    pub col_stop: Option<isize>,
}

impl CropBounds {
    /// Parse four bounds (row start, row stop, col start, col stop); each is
    /// an integer or `None`.
    pub fn parse<S: AsRef<str>>(values: &[S]) -> Result<Self> {
        let [row_start, row_stop, col_start, col_stop] = values else {
            return Err(PrepError::parameter(format!(
                "crop needs 4 bounds, got {}",
                values.len()
            )));
        };
        Ok(Self {
            row_start: parse_bound(row_start.as_ref())?,
            row_stop: parse_bound(row_stop.as_ref())?,
            col_start: parse_bound(col_start.as_ref())?,
            col_stop: parse_bound(col_stop.as_ref())?,
        })
    }

    /// Resolve to concrete `(rows, cols)` ranges for an image of `dim`.
    pub fn resolve(
        &self,
        dim: (usize, usize),
    ) -> Result<(std::ops::Range<usize>, std::ops::Range<usize>)> {
        let (h, w) = dim;
        let rows = resolve_axis(self.row_start, self.row_stop, h);
        let cols = resolve_axis(self.col_start, self.col_stop, w);
        if rows.is_empty() || cols.is_empty() {
            return Err(PrepError::parameter(format!(
                "crop {self:?} leaves no pixels of a {h}x{w} image"
            )));
        }
        Ok((rows, cols))
    }
}

impl FromStr for CropBounds {
    type Err = PrepError;

    /// Comma-separated form, e.g. `"10,None,0,-10"`.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        Self::parse(&parts)
    }
}

fn parse_bound(value: &str) -> Result<Option<isize>> {
    if value.eq_ignore_ascii_case("none") || value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<isize>()
        .map(Some)
        .map_err(|_| PrepError::parameter(format!("invalid crop bound '{value}'")))
}

fn resolve_axis(start: Option<isize>, stop: Option<isize>, len: usize) -> std::ops::Range<usize> {
    let clamp = |v: isize| -> usize {
        if v < 0 {
            (len as isize + v).max(0) as usize
        } else {
            (v as usize).min(len)
        }
    };
    let start = start.map_or(0, clamp);
    let stop = stop.map_or(len, clamp);
    start..stop.max(start)
}

/// Crop an image to `bounds`.
pub fn crop(image: &Image, bounds: &CropBounds) -> Result<Image> {
    let (rows, cols) = bounds.resolve(image.dim())?;
    let data = image.data.slice(s![rows, cols]).to_owned();
    Ok(Image::new(data, image.sample_type))
}
