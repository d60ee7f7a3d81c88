//! caption_clips - caption sliding-window clips of an assembly recording
//! with a vision-language backend.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use carstage::caption::backends::build_captioner;
use carstage::caption::{job, WindowParams, ASSEMBLY_PROMPT};
use carstage::config::{
    CaptionJobConfig, DEFAULT_FRAMES_AFTER, DEFAULT_FRAMES_BEFORE, DEFAULT_INTERVAL,
    DEFAULT_MAX_NEW_TOKENS, DEFAULT_NUM_FRAMES,
};
use carstage::ui::Ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Folder of frames forming one sorted sequence.
    #[arg(long, default_value = "datasets/combined_rgb/images/test")]
    input_dir: PathBuf,
    /// Output JSON path, rewritten after every window.
    #[arg(long, default_value = "outputs/combined_rgb/captions_test.json")]
    output: PathBuf,
    /// Caption backend (stub|http).
    #[arg(long, default_value = "stub")]
    backend: String,
    /// Captioning sidecar URL, required by the http backend.
    #[arg(long, env = "CARSTAGE_CAPTION_ENDPOINT")]
    endpoint: Option<String>,
    /// Frames sampled per clip.
    #[arg(long, default_value_t = DEFAULT_NUM_FRAMES)]
    num_frames: usize,
    /// Frames before the center frame in each window.
    #[arg(long, default_value_t = DEFAULT_FRAMES_BEFORE)]
    frames_before: usize,
    /// Frames after the center frame in each window.
    #[arg(long, default_value_t = DEFAULT_FRAMES_AFTER)]
    frames_after: usize,
    /// Step between consecutive center frames.
    #[arg(long, default_value_t = DEFAULT_INTERVAL)]
    interval: usize,
    /// Shift applied to the first center frame.
    #[arg(long, default_value_t = 0)]
    offset: usize,
    /// Generation budget per clip.
    #[arg(long, default_value_t = DEFAULT_MAX_NEW_TOKENS)]
    max_new_tokens: usize,
    /// File holding the instruction prompt; the built-in assembly prompt
    /// is used when absent.
    #[arg(long)]
    prompt_file: Option<PathBuf>,
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

    let prompt = match &args.prompt_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read prompt file {}", path.display()))?,
        None => ASSEMBLY_PROMPT.to_string(),
    };

    let cfg = CaptionJobConfig {
        input_dir: args.input_dir,
        output_path: args.output,
        window: WindowParams {
            num_frames: args.num_frames,
            frames_before: args.frames_before,
            frames_after: args.frames_after,
            interval: args.interval,
            offset: args.offset,
        },
        prompt,
        max_new_tokens: args.max_new_tokens,
    };
    cfg.validate()?;

    let mut backend = build_captioner(&args.backend, args.endpoint.as_deref())?;
    log::info!("caption backend: {}", backend.name());

    let summary = job::run(&cfg, backend.as_mut(), &ui)?;
    println!(
        "captioned {} windows ({} skipped at session boundaries) into {}",
        summary.captioned,
        summary.skipped,
        cfg.output_path.display()
    );
    Ok(())
}
