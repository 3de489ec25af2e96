use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use screenprep_core::batch::write_max_masks;
use screenprep_core::io::FsImageStore;

use super::load_config;
use crate::progress::BarReporter;
use crate::summary::print_mask_report;

#[derive(Args)]
pub struct MaskArgs {
    /// Images to mask
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Offset added to the automatic threshold, in sample units
    #[arg(short, long, allow_hyphen_values = true)]
    pub offset: Option<i32>,

    /// Radius of the closing applied to the mask
    #[arg(short, long)]
    pub close: Option<usize>,

    /// Radius of the erosion applied after closing
    #[arg(short, long)]
    pub erode: Option<usize>,

    /// Config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &MaskArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut params = config.mask;
    if let Some(offset) = args.offset {
        params.offset = offset;
    }
    if let Some(close) = args.close {
        params.close_radius = close;
    }
    if let Some(erode) = args.erode {
        params.erode_radius = erode;
    }

    let report = write_max_masks(
        &FsImageStore,
        &args.images,
        &params,
        &config.naming.mask_suffix,
        &BarReporter::new(),
    );
    print_mask_report(&report);

    if report.failed == report.processed {
        bail!("No image could be processed");
    }
    Ok(())
}
