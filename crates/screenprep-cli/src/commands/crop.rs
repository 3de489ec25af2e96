use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use screenprep_core::batch::run_crop;
use screenprep_core::crop::CropBounds;
use screenprep_core::io::FsImageStore;

use super::load_config;
use crate::progress::BarReporter;
use crate::summary::print_outputs;

#[derive(Args)]
pub struct CropArgs {
    /// First row kept (integer or None; negative counts from the bottom)
    #[arg(allow_hyphen_values = true)]
    pub row_start: String,

    /// Row after the last one kept (integer or None)
    #[arg(allow_hyphen_values = true)]
    pub row_stop: String,

    /// First column kept (integer or None)
    #[arg(allow_hyphen_values = true)]
    pub col_start: String,

    /// Column after the last one kept (integer or None)
    #[arg(allow_hyphen_values = true)]
    pub col_stop: String,

    /// Images to crop
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Suffix replacing each input's extension [default: .crop.tif]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write outputs into this directory instead of next to the inputs
    #[arg(short = 'O', long)]
    pub outdir: Option<PathBuf>,

    /// Config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &CropArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let bounds = CropBounds::parse(&[
        &args.row_start,
        &args.row_stop,
        &args.col_start,
        &args.col_stop,
    ])
    .context("Invalid crop bounds")?;
    let suffix = args
        .output
        .clone()
        .unwrap_or(config.naming.crop_suffix);

    if let Some(dir) = &args.outdir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let outputs = run_crop(
        &FsImageStore,
        &args.images,
        &bounds,
        &suffix,
        args.outdir.as_deref(),
        &BarReporter::new(),
    )?;
    print_outputs("Cropped", &outputs);
    Ok(())
}
