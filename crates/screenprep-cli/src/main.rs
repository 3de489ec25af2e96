mod commands;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "screenprep", about = "Microscopy screen preprocessing tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crop images to fixed bounds
    Crop(commands::crop::CropArgs),
    /// Write masks of bright artifacts
    Mask(commands::mask::MaskArgs),
    /// Estimate and correct uneven illumination
    Illum(commands::illum::IllumArgs),
    /// Stitch groups of four quadrant images
    Stitch(commands::stitch::StitchArgs),
    /// Concatenate single-channel images into color images
    Cat(commands::cat::CatArgs),
    /// Extract a feature table from images
    Features(commands::features::FeaturesArgs),
    /// Print or save the default configuration as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Crop(args) => commands::crop::run(args),
        Commands::Mask(args) => commands::mask::run(args),
        Commands::Illum(args) => commands::illum::run(args),
        Commands::Stitch(args) => commands::stitch::run(args),
        Commands::Cat(args) => commands::cat::run(args),
        Commands::Features(args) => commands::features::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
