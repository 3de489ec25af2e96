use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use screenprep_core::batch::run_features;
use screenprep_core::features::{available_screens, filenames_path, screen_by_name};
use screenprep_core::io::FsImageStore;

use crate::progress::BarReporter;
use crate::summary::print_saved;

#[derive(Args)]
pub struct FeaturesArgs {
    /// Images to extract features from
    #[arg(required_unless_present = "list_screens")]
    pub images: Vec<PathBuf>,

    /// Feature table output (JSON)
    #[arg(short, long, default_value = "features.json")]
    pub output: PathBuf,

    /// Screen whose feature map is applied
    #[arg(short, long, default_value = "intensity")]
    pub screen: String,

    /// List available screens and exit
    #[arg(long)]
    pub list_screens: bool,
}

pub fn run(args: &FeaturesArgs) -> Result<()> {
    if args.list_screens {
        for name in available_screens() {
            println!("{name}");
        }
        return Ok(());
    }

    let screen = screen_by_name(&args.screen)?;
    let table = run_features(
        &FsImageStore,
        &args.images,
        screen.as_ref(),
        &args.output,
        &BarReporter::new(),
    )?;
    println!(
        "{} samples x {} features",
        table.len(),
        table.names.len()
    );
    print_saved("Feature table", &args.output);
    print_saved("File list", &filenames_path(&args.output));
    Ok(())
}
