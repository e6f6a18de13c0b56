use clap::{Parser, ValueEnum};
use log::{info, warn};
use std::path::PathBuf;
use track_extract::pipeline::{process_image, run_batch};
use track_extract::{load_config, TrackConfig, TrackProcessor};

/// Extract track edges and centerlines from top-down track images
#[derive(Parser, Debug)]
#[command(name = "track-extract", version)]
#[command(about = "Extract racetrack boundaries and centerlines from images", long_about = None)]
struct Args {
    /// Directory of track images processed in batch mode
    #[arg(short, long, default_value = "trackImages")]
    input: PathBuf,

    /// Output root; each image gets its own subdirectory
    #[arg(short, long, default_value = "processedTracks")]
    output: PathBuf,

    /// Process a single image instead of the input directory
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Also extract and write the centerline
    #[arg(long)]
    extract_centerline: bool,

    /// Centerline method
    #[arg(long, value_enum, default_value = "skeleton")]
    centerline_method: CenterlineMethod,

    /// Save intermediate masks and a stage trace per image
    #[arg(short, long)]
    debug: bool,

    /// JSON calibration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Points per resampled boundary (overrides the config file)
    #[arg(short, long)]
    points: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CenterlineMethod {
    Skeleton,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path).map_err(|e| e.to_string())?,
        None => TrackConfig::default(),
    };
    if let Some(points) = args.points {
        if points == 0 {
            return Err("--points must be positive".to_string());
        }
        config.target_points = points;
    }
    config.extract_centerline |= args.extract_centerline;
    if config.extract_centerline {
        info!("centerline method: {:?}", args.centerline_method);
    }

    let processor = TrackProcessor::new(config);

    if let Some(file) = &args.file {
        let summary = process_image(&processor, file, &args.output, args.debug)
            .map_err(|e| e.to_string())?;
        for skipped in &summary.skipped {
            warn!("skipped {}: {}", skipped.artifact, skipped.reason);
        }
        if !summary.processing_successful {
            return Err(format!("no track boundaries extracted from {}", file.display()));
        }
        info!(
            "wrote {} files to {}",
            summary.processed_files.len(),
            summary.output_directory.display()
        );
        return Ok(());
    }

    let report = run_batch(&processor, &args.input, &args.output, args.debug)
        .map_err(|e| e.to_string())?;
    if report.succeeded() == 0 {
        return Err(format!(
            "no image in {} produced track boundaries",
            args.input.display()
        ));
    }
    Ok(())
}
