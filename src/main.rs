//! # Image Optimizer - Main Entry Point
//!
//! CLI front-end for the upload optimization pipeline.
//!
//! ## Execution flow:
//! 1. Parse CLI arguments (inputs, purpose, overrides, output directory)
//! 2. Configure logging (INFO, or DEBUG with --verbose)
//! 3. Validate the configuration and resolve the effective profile
//! 4. Discover and load the input images
//! 5. Run the batch optimizer with a progress bar
//! 6. Write results (optimized, or originals for fallbacks) to the output
//!    directory and report statistics
//!
//! ## Example:
//! ```bash
//! image-optimizer ./uploads --purpose gallery --output ./optimized --verbose
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

use subcity_image_optimizer::{
    config::Config,
    file_manager::FileManager,
    json_output::JsonMessage,
    optimizer::BatchOptimizer,
    profile::OutputFormat,
    progress::{OptimizationStats, ProgressManager},
};

#[derive(Parser)]
#[command(name = "image-optimizer")]
#[command(about = "Optimize upload images for the sub-city portal")]
struct Args {
    /// Image files or directories to optimize
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Upload purpose selecting the profile (news, institution, gallery, thumbnail)
    #[arg(short, long, default_value = "news")]
    purpose: String,

    /// Encoder quality override, in (0, 1]
    #[arg(short, long)]
    quality: Option<f32>,

    /// Maximum width override in pixels
    #[arg(long)]
    max_width: Option<u32>,

    /// Maximum height override in pixels
    #[arg(long)]
    max_height: Option<u32>,

    /// Output format override (webp, jpeg, png)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Directory for optimized files
    #[arg(short, long, default_value = "optimized")]
    output: PathBuf,

    /// Emit progress and results as JSON lines on stdout
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let json_output = args.json;
    match run(args).await {
        Ok(()) => Ok(()),
        Err(err) => {
            if json_output {
                JsonMessage::Error {
                    message: err.to_string(),
                }
                .emit();
            }
            Err(err)
        }
    }
}

async fn run(args: Args) -> Result<()> {
    // Create the output directory if needed
    if !args.output.exists() {
        std::fs::create_dir_all(&args.output)?;
        info!("Created output directory: {}", args.output.display());
    }

    let config = Config {
        purpose: args.purpose,
        quality: args.quality,
        max_width: args.max_width,
        max_height: args.max_height,
        output_format: args.format,
        output_path: Some(args.output.clone()),
        json_output: args.json,
    };
    config.validate()?;

    let profile = config.effective_profile();
    info!(
        "Profile `{}`: max {}x{}, quality {:.2}, format {}",
        config.purpose, profile.max_width, profile.max_height, profile.quality,
        profile.output_format
    );

    // Collect input files
    let mut paths = Vec::new();
    for input in &args.inputs {
        if input.is_dir() {
            paths.extend(FileManager::find_image_files(input)?);
        } else if input.exists() {
            paths.push(input.clone());
        } else {
            return Err(anyhow::anyhow!("Input does not exist: {}", input.display()));
        }
    }

    if paths.is_empty() {
        info!("No image files found to process");
        return Ok(());
    }
    info!("Found {} image files to process", paths.len());

    let mut sources = Vec::with_capacity(paths.len());
    for path in &paths {
        sources.push(FileManager::load_source(path).await?);
    }

    if config.json_output {
        JsonMessage::Start {
            purpose: config.purpose.clone(),
            total_files: sources.len(),
            max_width: profile.max_width,
            max_height: profile.max_height,
            quality: profile.quality,
            output_format: profile.output_format.to_string(),
        }
        .emit();
    }

    let progress = ProgressManager::new(sources.len() as u64);
    let optimizer = BatchOptimizer::new(profile);

    let started = Instant::now();
    let results = optimizer
        .optimize_batch_with_progress(sources, |done, total| {
            progress.update(&format!("{done}/{total}"));
        })
        .await;

    // Write results and collect statistics
    let mut stats = OptimizationStats::new();
    for item in &results {
        stats.record(item);

        if config.json_output {
            JsonMessage::file_complete(item).emit();
        }

        let destination = args.output.join(item.name());
        tokio::fs::write(&destination, item.bytes()).await?;
        debug!("Wrote {}", destination.display());
    }

    progress.finish(&stats.format_summary());

    info!("=== Optimization Complete ===");
    info!("Files processed: {}", stats.files_processed);
    info!("Files optimized: {}", stats.files_optimized);
    info!("Fallbacks (kept original): {}", stats.files_fallback);
    info!(
        "Bytes saved: {}",
        FileManager::format_size(stats.total_bytes_saved)
    );
    info!("Average reduction: {:.2}%", stats.overall_reduction_percent());

    if config.json_output {
        JsonMessage::complete(&stats, started.elapsed().as_secs_f64()).emit();
    }

    Ok(())
}
