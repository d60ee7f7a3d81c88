//! Clip-captioning batch job.
//!
//! Walks the planned windows in order, samples and decodes each clip,
//! invokes the caption backend, and rewrites the output document after
//! every window. Any decode or generation error aborts the run; whatever
//! was already flushed stays on disk.

use anyhow::Result;

use crate::caption::backend::{CaptionBackend, CaptionRequest};
use crate::caption::clip;
use crate::caption::run::CaptionRun;
use crate::caption::window;
use crate::config::CaptionJobConfig;
use crate::sequence;
use crate::ui::Ui;

/// Result counts for one captioning run.
#[derive(Clone, Debug)]
pub struct CaptionSummary {
    pub captioned: usize,
    pub skipped: usize,
}

pub fn run(
    cfg: &CaptionJobConfig,
    backend: &mut dyn CaptionBackend,
    ui: &Ui,
) -> Result<CaptionSummary> {
    cfg.validate()?;
    {
        let _stage = ui.stage("Warm up captioner");
        backend.warm_up()?;
    }

    let paths = sequence::list_frames(&cfg.input_dir)?;
    let names = paths
        .iter()
        .map(|path| sequence::file_name(path).map(str::to_string))
        .collect::<Result<Vec<String>>>()?;

    let plan = window::plan_windows(&names, &cfg.window)?;
    log::info!(
        "{} frames, {} windows planned, {} skipped at session boundaries",
        names.len(),
        plan.windows.len(),
        plan.skipped
    );

    let mut document = CaptionRun::new(&cfg.window, &cfg.prompt);
    let request = CaptionRequest {
        prompt: &cfg.prompt,
        max_new_tokens: cfg.max_new_tokens,
    };

    let bar = ui.bar(plan.windows.len() as u64, "caption windows");
    for win in &plan.windows {
        let clip = clip::load_clip(&paths[win.start..=win.end], cfg.window.num_frames)?;
        let sequences = backend.describe(&clip, &request)?;
        document.record(&names[win.center], sequences);
        document.write(&cfg.output_path)?;
        bar.inc(1);
    }
    bar.finish();

    log::info!(
        "captioned {} windows into {}",
        document.outputs.len(),
        cfg.output_path.display()
    );
    Ok(CaptionSummary {
        captioned: document.outputs.len(),
        skipped: plan.skipped,
    })
}
