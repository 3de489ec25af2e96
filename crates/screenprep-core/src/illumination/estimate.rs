use std::borrow::Cow;

use ndarray::{Array2, Zip};
use tracing::{debug, info};

use crate::error::{check_shape, PrepError, Result};
use crate::filters::stretch::stretch;
use crate::image::Image;
use crate::mask::estimate_mask;

use super::config::{Aggregation, IlluminationParams};
use super::field::IlluminationField;
use super::quantile_filter::quantile_filter;

/// Estimate one illumination field shared by a stack of same-shape images.
///
/// Each image is reduced to a local background map ([`local_background`]),
/// and the maps are combined per pixel with `params.aggregation`.
pub fn estimate_illumination(
    images: &[Image],
    params: &IlluminationParams,
) -> Result<IlluminationField> {
    params.validate()?;
    let Some(first) = images.first() else {
        return Err(PrepError::EmptyInput("illumination stack"));
    };
    for image in &images[1..] {
        check_shape(first.dim(), image.dim())?;
    }

    let mut accumulator = FieldAccumulator::new(params.aggregation);
    for (i, image) in images.iter().enumerate() {
        accumulator.push(local_background(image, params)?)?;
        debug!(image = i, "Local background estimated");
    }
    let field = accumulator.finish()?;

    info!(
        images = images.len(),
        radius = params.radius,
        quantile = params.quantile,
        aggregation = %params.aggregation,
        min = field.min(),
        max = field.max(),
        "Illumination field estimated"
    );
    Ok(field)
}

/// Per-image background: the windowed quantile of the (optionally stretched)
/// image, with artifact pixels excluded when `use_mask` is set.
///
/// The artifact mask is estimated on the unstretched image so `mask.offset`
/// keeps its acquisition units. Windows with no usable pixel are NaN.
pub fn local_background(image: &Image, params: &IlluminationParams) -> Result<Array2<f32>> {
    params.validate()?;

    let artifacts = params.use_mask.then(|| estimate_mask(image, &params.mask));
    let source = if params.stretch_in > 0.0 {
        Cow::Owned(stretch(image, params.stretch_in, 1.0 - params.stretch_in)?)
    } else {
        Cow::Borrowed(image)
    };

    Ok(quantile_filter(
        &source,
        params.radius,
        params.quantile,
        artifacts.as_ref().map(|m| &m.data),
    ))
}

#[derive(Clone, Debug)]
enum AccumulatorState {
    Empty,
    Min(Array2<f32>),
    Mean { sum: Array2<f64>, count: Array2<u32> },
    Median(Vec<Array2<f32>>),
}

/// Combines per-image background maps into one field.
///
/// Second pass of the two-pass estimation protocol: maps can be pushed one at
/// a time as they are computed, and partial accumulators merged, so `Min`
/// and `Mean` never hold more than one map per accumulator. NaN entries are
/// treated as missing.
#[derive(Clone, Debug)]
pub struct FieldAccumulator {
    aggregation: Aggregation,
    images: usize,
    state: AccumulatorState,
}

impl FieldAccumulator {
    pub fn new(aggregation: Aggregation) -> Self {
        Self {
            aggregation,
            images: 0,
            state: AccumulatorState::Empty,
        }
    }

    /// Number of maps accumulated so far.
    pub fn len(&self) -> usize {
        self.images
    }

    pub fn is_empty(&self) -> bool {
        self.images == 0
    }

    pub fn dim(&self) -> Option<(usize, usize)> {
        match &self.state {
            AccumulatorState::Empty => None,
            AccumulatorState::Min(m) => Some(m.dim()),
            AccumulatorState::Mean { sum, .. } => Some(sum.dim()),
            AccumulatorState::Median(maps) => maps.first().map(|m| m.dim()),
        }
    }

    pub fn push(&mut self, local: Array2<f32>) -> Result<()> {
        if let Some(dim) = self.dim() {
            check_shape(dim, local.dim())?;
        }
        self.images += 1;

        match &mut self.state {
            AccumulatorState::Empty => {
                self.state = match self.aggregation {
                    Aggregation::Min => AccumulatorState::Min(local),
                    Aggregation::Mean => AccumulatorState::Mean {
                        sum: local.mapv(|v| if v.is_nan() { 0.0 } else { v as f64 }),
                        count: local.mapv(|v| (!v.is_nan()) as u32),
                    },
                    Aggregation::Median => AccumulatorState::Median(vec![local]),
                };
            }
            AccumulatorState::Min(min) => min_into(min, &local),
            AccumulatorState::Mean { sum, count } => {
                Zip::from(sum)
                    .and(count)
                    .and(&local)
                    .for_each(|s, n, &v| {
                        if !v.is_nan() {
                            *s += v as f64;
                            *n += 1;
                        }
                    });
            }
            AccumulatorState::Median(maps) => maps.push(local),
        }
        Ok(())
    }

    /// Combine two partial accumulators with the same aggregation.
    pub fn merge(mut self, other: FieldAccumulator) -> Result<FieldAccumulator> {
        if other.aggregation != self.aggregation {
            return Err(PrepError::parameter(format!(
                "cannot merge {} accumulator into {}",
                other.aggregation, self.aggregation
            )));
        }
        if let (Some(a), Some(b)) = (self.dim(), other.dim()) {
            check_shape(a, b)?;
        }

        let images = self.images + other.images;
        self.state = match (self.state, other.state) {
            (AccumulatorState::Empty, state) | (state, AccumulatorState::Empty) => state,
            (AccumulatorState::Min(mut a), AccumulatorState::Min(b)) => {
                min_into(&mut a, &b);
                AccumulatorState::Min(a)
            }
            (
                AccumulatorState::Mean {
                    sum: mut sa,
                    count: mut ca,
                },
                AccumulatorState::Mean { sum: sb, count: cb },
            ) => {
                sa += &sb;
                ca += &cb;
                AccumulatorState::Mean { sum: sa, count: ca }
            }
            (AccumulatorState::Median(mut a), AccumulatorState::Median(b)) => {
                a.extend(b);
                AccumulatorState::Median(a)
            }
            _ => unreachable!("accumulators with equal aggregation share a state kind"),
        };
        self.images = images;
        Ok(self)
    }

    /// Produce the field.
    ///
    /// Pixels missing from every map are filled with the median of the valid
    /// field values (0 if there are none); negatives are clamped to 0.
    pub fn finish(self) -> Result<IlluminationField> {
        let mut data = match self.state {
            AccumulatorState::Empty => return Err(PrepError::EmptyInput("illumination stack")),
            AccumulatorState::Min(min) => min,
            AccumulatorState::Mean { sum, count } => {
                Zip::from(&sum).and(&count).map_collect(|&s, &n| {
                    if n == 0 {
                        f32::NAN
                    } else {
                        (s / n as f64) as f32
                    }
                })
            }
            AccumulatorState::Median(maps) => median_of_maps(&maps),
        };

        fill_missing(&mut data);
        data.mapv_inplace(|v| v.max(0.0));
        Ok(IlluminationField::new(data))
    }
}

/// NaN-aware element-wise minimum into `acc`.
fn min_into(acc: &mut Array2<f32>, other: &Array2<f32>) {
    Zip::from(acc).and(other).for_each(|a, &b| {
        if !b.is_nan() && (a.is_nan() || b < *a) {
            *a = b;
        }
    });
}

fn median_of_maps(maps: &[Array2<f32>]) -> Array2<f32> {
    let dim = maps[0].dim();
    let mut pixel_values = Vec::with_capacity(maps.len());
    Array2::from_shape_fn(dim, |idx| {
        pixel_values.clear();
        pixel_values.extend(maps.iter().map(|m| m[idx]).filter(|v| !v.is_nan()));
        compute_median(&mut pixel_values).unwrap_or(f32::NAN)
    })
}

fn fill_missing(data: &mut Array2<f32>) {
    if !data.iter().any(|v| v.is_nan()) {
        return;
    }
    let mut valid: Vec<f32> = data.iter().copied().filter(|v| !v.is_nan()).collect();
    let fill = compute_median(&mut valid).unwrap_or(0.0);
    data.mapv_inplace(|v| if v.is_nan() { fill } else { v });
}

/// Median via `select_nth_unstable`, averaging the middle pair for even counts.
fn compute_median(pixel_values: &mut [f32]) -> Option<f32> {
    let n = pixel_values.len();
    match n {
        0 => None,
        1 => Some(pixel_values[0]),
        _ if n % 2 == 1 => {
            let mid = n / 2;
            Some(
                *pixel_values
                    .select_nth_unstable_by(mid, |a, b| a.total_cmp(b))
                    .1,
            )
        }
        _ => {
            let mid = n / 2;
            pixel_values.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
            let upper = pixel_values[mid];
            pixel_values[..mid].select_nth_unstable_by(mid - 1, |a, b| a.total_cmp(b));
            Some((pixel_values[mid - 1] + upper) / 2.0)
        }
    }
}
