use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use screenprep_core::batch::{run_illumination, IlluminationJob};
use screenprep_core::illumination::Aggregation;
use screenprep_core::io::FsImageStore;

use super::{collect_inputs, load_config};
use crate::progress::BarReporter;
use crate::summary::{print_illumination_plan, print_illumination_report, print_saved};

#[derive(Args)]
pub struct IllumArgs {
    /// Images sharing one illumination field
    pub images: Vec<PathBuf>,

    /// Text file listing further images, one per line
    #[arg(long)]
    pub file_list: Option<PathBuf>,

    /// Suffix replacing each input's extension [default: .illum.tif]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Exclude bright artifacts from the background estimate
    #[arg(short = 'M', long)]
    pub use_mask: bool,

    /// Artifact threshold offset
    #[arg(short = 'm', long, allow_hyphen_values = true)]
    pub mask_offset: Option<i32>,

    /// Artifact mask closing radius
    #[arg(short = 'c', long)]
    pub mask_close: Option<usize>,

    /// Artifact mask erosion radius
    #[arg(short = 'e', long)]
    pub mask_erode: Option<usize>,

    /// Stretch inputs to (l, 1 - l) quantiles before estimation
    #[arg(short = 'l', long)]
    pub stretchlim: Option<f32>,

    /// Stretch outputs to (L, 1 - L) quantiles after correction
    #[arg(short = 'L', long)]
    pub stretchlim_output: Option<f32>,

    /// Quantile of each window taken as background [default: 0.05]
    #[arg(short, long)]
    pub quantile: Option<f32>,

    /// Radius of the background window [default: 51]
    #[arg(short, long)]
    pub radius: Option<usize>,

    /// Save the estimated field to this file
    #[arg(short, long)]
    pub save_illumination: Option<PathBuf>,

    /// Use a previously saved field instead of estimating one
    #[arg(long)]
    pub illumination: Option<PathBuf>,

    /// How per-image backgrounds are combined (min, median, mean).
    /// median holds every background in memory; use min or mean for large stacks
    #[arg(long)]
    pub aggregation: Option<Aggregation>,

    /// Config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &IllumArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    let illum = &mut config.illumination;
    illum.use_mask |= args.use_mask;
    if let Some(v) = args.mask_offset {
        illum.mask.offset = v;
    }
    if let Some(v) = args.mask_close {
        illum.mask.close_radius = v;
    }
    if let Some(v) = args.mask_erode {
        illum.mask.erode_radius = v;
    }
    if let Some(v) = args.stretchlim {
        illum.stretch_in = v;
    }
    if let Some(v) = args.quantile {
        illum.quantile = v;
    }
    if let Some(v) = args.radius {
        illum.radius = v;
    }
    if let Some(v) = args.aggregation {
        illum.aggregation = v;
    }
    if let Some(v) = args.stretchlim_output {
        config.correction.stretch_out = v;
    }
    if let Some(suffix) = &args.output {
        config.naming.illum_suffix = suffix.clone();
    }

    let job = IlluminationJob {
        paths: collect_inputs(&args.images, args.file_list.as_deref())?,
        config,
        save_field: args.save_illumination.clone(),
        load_field: args.illumination.clone(),
    };
    print_illumination_plan(&job);

    let report = run_illumination(&FsImageStore, &job, &BarReporter::new())?;
    print_illumination_report(&report);
    if let Some(path) = &job.save_field {
        print_saved("Illumination field", path);
    }
    Ok(())
}
