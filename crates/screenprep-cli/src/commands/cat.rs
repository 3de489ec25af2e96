use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use screenprep_core::batch::run_channel_concat;
use screenprep_core::io::FsImageStore;

use crate::progress::BarReporter;
use crate::summary::print_outputs;

#[derive(Args)]
pub struct CatArgs {
    /// Single-channel images, three per output in channel order
    #[arg(required = true)]
    pub images: Vec<PathBuf>,
}

pub fn run(args: &CatArgs) -> Result<()> {
    let outputs = run_channel_concat(&FsImageStore, &args.images, &BarReporter::new())?;
    print_outputs("Concatenated", &outputs);
    Ok(())
}
