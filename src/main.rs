use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shapescan::batch::{self, BatchOptions};
use shapescan::{DetectionConfig, Labeller, ShapeDetector};

#[derive(Parser)]
#[command(name = "shapescan")]
#[command(about = "Detect colored geometric shapes in images")]
struct Cli {
    /// Image files to process, in order
    #[arg(value_name = "IMAGE")]
    images: Vec<PathBuf>,

    /// Process every image in this directory (after any explicit IMAGE arguments)
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Write labelled copies of the inputs to this directory (must be empty)
    #[arg(long, value_name = "DIR")]
    labelled_out: Option<PathBuf>,

    /// Font used for label text; without it only centroid markers are drawn
    #[arg(long, value_name = "TTF")]
    font: Option<PathBuf>,

    /// Label text height in pixels
    #[arg(long, value_name = "PX", default_value_t = 14.0)]
    font_size: f32,

    /// Save edge maps to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Detection parameters as JSON
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => DetectionConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => DetectionConfig::default(),
    };
    let detector = ShapeDetector::with_config(config);

    let mut paths = args.images.clone();
    if let Some(dir) = &args.dir {
        let found = batch::collect_images(dir)
            .with_context(|| format!("Failed to scan {}", dir.display()))?;
        paths.extend(found);
    }
    if paths.is_empty() {
        anyhow::bail!("No input images given (pass IMAGE paths or --dir)");
    }

    let mut labeller = Labeller::new().with_scale(args.font_size);
    if let Some(font) = &args.font {
        labeller = labeller.with_font_file(font)?;
    }
    if args.labelled_out.is_some() && !labeller.has_font() {
        info!("No --font given, labelled images get centroid markers only");
    }
    for dir in [&args.labelled_out, &args.debug_out].into_iter().flatten() {
        batch::prepare_output_dir(dir)?;
    }

    let options = BatchOptions {
        labelled_out: args.labelled_out.clone(),
        debug_out: args.debug_out.clone(),
        labeller,
    };

    let summary = batch::run_batch(&detector, &paths, &options);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary.reports)?);
    } else {
        for report in &summary.reports {
            println!("\n============================================");
            println!("\nFor {}", report.path.display());
            match &report.error {
                Some(err) => println!("Error: {}", err),
                None => {
                    let shapes: Vec<String> = report.shapes.iter().map(|s| s.to_string()).collect();
                    println!("[{}]", shapes.join(", "));
                }
            }
        }
        println!(
            "\nProcessed {} images: {} shapes, {} failures",
            summary.reports.len(),
            summary.total_shapes(),
            summary.failures()
        );
    }

    if summary.failures() > 0 {
        anyhow::bail!("{} of {} images failed", summary.failures(), summary.reports.len());
    }

    Ok(())
}
