//! synthetic_labels - convert COCO-style synthetic annotations into
//! per-image YOLO label files plus image copies.

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use carstage::config::{SyntheticJobConfig, DEFAULT_SYNTHETIC_HEIGHT, DEFAULT_SYNTHETIC_WIDTH};
use carstage::synthetic;
use carstage::ui::Ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// COCO-style annotations file.
    #[arg(long, default_value = "synthetic_data/labels_coco.json")]
    annotations: PathBuf,
    /// Folder holding the source images.
    #[arg(long, default_value = "synthetic_data/images")]
    images: PathBuf,
    /// Output root; images/ and labels/ are created beneath it.
    #[arg(long, default_value = "labeled_synthetic_data")]
    output_root: PathBuf,
    /// Fixed width of every synthetic image.
    #[arg(long, default_value_t = DEFAULT_SYNTHETIC_WIDTH)]
    image_width: u32,
    /// Fixed height of every synthetic image.
    #[arg(long, default_value_t = DEFAULT_SYNTHETIC_HEIGHT)]
    image_height: u32,
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

    let cfg = SyntheticJobConfig {
        annotations_path: args.annotations,
        image_dir: args.images,
        output_root: args.output_root,
        image_width: args.image_width,
        image_height: args.image_height,
    };
    cfg.validate()?;

    let summary = synthetic::convert(&cfg, &ui)?;
    println!(
        "{} annotations converted into {} label files under {}",
        summary.annotations,
        summary.label_files,
        cfg.output_root.display()
    );
    Ok(())
}
