//! stage_vectors - flatten detection records into feature vectors paired
//! with stage completion labels.

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use carstage::ui::Ui;
use carstage::vectorize;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Records JSON produced by detect_records.
    #[arg(long, default_value = "outputs/combined_rgb/detections_test.json")]
    records: PathBuf,
    /// Output dataset JSON path.
    #[arg(long, default_value = "outputs/combined_rgb/stage_vectors_test.json")]
    output: PathBuf,
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

    let dataset = {
        let _stage = ui.stage("Vectorize records");
        vectorize::vectorize_records(&args.records)?
    };
    {
        let _stage = ui.stage("Write dataset");
        dataset.write(&args.output)?;
    }

    let feature_len = dataset.features.first().map(Vec::len).unwrap_or(0);
    println!(
        "{} frames vectorized ({} features each) into {}",
        dataset.len(),
        feature_len,
        args.output.display()
    );
    Ok(())
}
