use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use screenprep_core::batch::{run_quadrant_stitch, Grouping};
use screenprep_core::io::FsImageStore;

use crate::progress::BarReporter;
use crate::summary::print_outputs;

#[derive(Args)]
pub struct StitchArgs {
    /// Tiles, four per field in order top-left, top-right, bottom-left, bottom-right
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Group tiles by file name, reading the quadrant from its s1..s4 token
    #[arg(long)]
    pub by_site: bool,
}

pub fn run(args: &StitchArgs) -> Result<()> {
    let grouping = if args.by_site {
        Grouping::BySite
    } else {
        Grouping::Sequential
    };
    let outputs = run_quadrant_stitch(&FsImageStore, &args.images, grouping, &BarReporter::new())?;
    print_outputs("Stitched", &outputs);
    Ok(())
}
