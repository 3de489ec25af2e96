//! Batch orchestration over lists of image files.
//!
//! Each driver reads through an [`ImageStore`](crate::io::ImageStore),
//! processes images independently with rayon, and reports progress through a
//! [`ProgressReporter`].

pub mod config;
mod features;
mod illumination;
mod masks;
mod reshape;
mod stitch;
mod types;

pub use config::{NamingConfig, PrepConfig};
pub use features::run_features;
pub use illumination::{
    correct_paths, estimate_from_paths, run_illumination, CorrectionReport, IlluminationJob,
    IlluminationReport,
};
pub use masks::{write_max_masks, MaskReport};
pub use reshape::{run_channel_concat, run_crop};
pub use stitch::{parse_site, plan_stitch, run_quadrant_stitch, Grouping, StitchGroup};
pub use types::{BatchStage, NoOpReporter, ProgressReporter};
