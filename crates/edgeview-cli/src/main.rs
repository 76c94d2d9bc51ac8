//! Edgeview CLI - Main Entry Point
//!
//! Runs the camera edge pipeline on a raw NV21 frame dump and writes the
//! resulting edge map as PNG (for the web viewer) or raw bytes.
//!
//! Usage:
//!     edgeview --input frame.nv21 --width 640 --height 480
//!     edgeview --input frame.nv21 --width 640 --height 480 --raw --output edges.gray
//!     edgeview --input frame.nv21 --width 640 --height 480 --json

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use edgeview::{EdgeError, EdgeProcessor, ProcessingStats};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "edgeview")]
#[command(about = "Detect edges in a raw NV21 camera frame")]
#[command(version)]
struct Args {
    /// Raw NV21 frame (luma plane followed by interleaved chroma)
    #[arg(short, long)]
    input: PathBuf,

    /// Frame width in pixels
    #[arg(long)]
    width: i32,

    /// Frame height in pixels
    #[arg(long)]
    height: i32,

    /// Output path (defaults to the input path with .edges.png / .edges.gray)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write raw width*height bytes instead of PNG
    #[arg(long)]
    raw: bool,

    /// Print processing stats as JSON
    #[arg(long)]
    json: bool,

    /// Log level (debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Edge(#[from] EdgeError),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Stats record in the shape the web viewer displays.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameReport {
    resolution: String,
    processing_time_ms: f64,
    output: String,
    #[serde(flatten)]
    stats: ProcessingStats,
}

impl FrameReport {
    fn new(stats: ProcessingStats, output: &std::path::Path) -> Self {
        Self {
            resolution: stats.resolution(),
            processing_time_ms: stats.processing_ms(),
            output: output.display().to_string(),
            stats,
        }
    }
}

fn default_output(input: &std::path::Path, raw: bool) -> PathBuf {
    input.with_extension(if raw { "edges.gray" } else { "edges.png" })
}

fn run(args: &Args) -> Result<FrameReport, CliError> {
    let frame = fs::read(&args.input).map_err(|source| CliError::Read {
        path: args.input.clone(),
        source,
    })?;
    info!(path = %args.input.display(), bytes = frame.len(), "loaded frame");

    let processor = EdgeProcessor::new();
    let (edges, stats) = processor.process_frame_with_stats(&frame, args.width, args.height)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input, args.raw));
    let bytes = if args.raw {
        edges.into_bytes()
    } else {
        edges.to_png().map_err(|e| CliError::Encode(e.to_string()))?
    };
    fs::write(&output, bytes).map_err(|source| CliError::Write {
        path: output.clone(),
        source,
    })?;
    info!(path = %output.display(), "wrote edge map");

    Ok(FrameReport::new(stats, &output))
}

fn main() {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let report = match run(&args) {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report).map_err(CliError::from) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("Resolution:      {}", report.resolution);
        println!("Processing time: {:.2} ms", report.processing_time_ms);
        println!("Edge pixels:     {}", report.stats.edge_pixels);
        println!("Output:          {}", report.output);
    }
}
