//! detect_records - build per-class best-box detection records for dataset
//! phases, with annotated frame copies as a side channel.

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use carstage::config::{
    DetectJobConfig, DEFAULT_BATCH_SIZE, DEFAULT_MIN_CONFIDENCE, DEFAULT_NUM_CLASSES,
};
use carstage::detect::backends::{build_detector, DetectorOptions};
use carstage::detect::job;
use carstage::ui::Ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Root folder containing one sub-folder of frames per phase.
    #[arg(long, default_value = "datasets/combined_rgb/images")]
    input_root: PathBuf,
    /// Output root for records JSON and annotated copies.
    #[arg(long, default_value = "outputs/combined_rgb")]
    output_root: PathBuf,
    /// Comma-separated phase sub-folders to process.
    #[arg(long, value_delimiter = ',', default_value = "test")]
    phases: Vec<String>,
    /// Detector backend (stub|tract).
    #[arg(long, default_value = "stub")]
    backend: String,
    /// Detector weights file, required by the tract backend.
    #[arg(long, env = "CARSTAGE_DETECTOR_WEIGHTS")]
    weights: Option<PathBuf>,
    /// Number of detector classes.
    #[arg(long, default_value_t = DEFAULT_NUM_CLASSES)]
    num_classes: usize,
    /// Frames per detector batch.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
    /// Confidence floor handed to the detector. Kept very low so even weak
    /// detections reach the best-per-class fold.
    #[arg(long, default_value_t = DEFAULT_MIN_CONFIDENCE)]
    min_confidence: f32,
    /// Model input width for the tract backend.
    #[arg(long, default_value_t = 640)]
    input_width: u32,
    /// Model input height for the tract backend.
    #[arg(long, default_value_t = 640)]
    input_height: u32,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let is_tty = std::io::stderr().is_terminal();
    let stdout_is_tty = std::io::stdout().is_terminal();
    let ui = Ui::from_args(Some(&args.ui), is_tty, !stdout_is_tty);

    let cfg = DetectJobConfig {
        input_root: args.input_root,
        output_root: args.output_root,
        phases: args.phases,
        batch_size: args.batch_size,
    };
    cfg.validate()?;

    let mut backend = build_detector(
        &args.backend,
        &DetectorOptions {
            weights: args.weights,
            num_classes: args.num_classes,
            min_confidence: args.min_confidence,
            input_width: args.input_width,
            input_height: args.input_height,
        },
    )?;
    log::info!(
        "detector backend: {} ({} classes, confidence floor {})",
        backend.name(),
        backend.num_classes(),
        backend.min_confidence()
    );

    let summaries = job::run(&cfg, backend.as_mut(), &ui)?;
    for summary in &summaries {
        println!(
            "phase {}: {} frames, {} detections, records at {}",
            summary.phase,
            summary.frames,
            summary.detections,
            summary.records_path.display()
        );
    }
    Ok(())
}
