//! Detection-record batch job.
//!
//! One run walks each phase folder in natural order, detects in fixed-size
//! batches, folds every candidate into the per-class best records, mirrors
//! an annotated copy of each frame, and writes the phase's records JSON
//! once after the phase completes. Any backend or decode error aborts the
//! run.

use anyhow::{Context, Result};

use crate::config::DetectJobConfig;
use crate::detect::annotate;
use crate::detect::backend::DetectorBackend;
use crate::detect::records::DetectionRecords;
use crate::sequence::{self, Frame};
use crate::ui::Ui;

/// Per-phase result counts.
#[derive(Clone, Debug)]
pub struct PhaseSummary {
    pub phase: String,
    pub frames: usize,
    pub detections: u64,
    pub records_path: std::path::PathBuf,
}

/// Run the builder over every configured phase.
pub fn run(
    cfg: &DetectJobConfig,
    backend: &mut dyn DetectorBackend,
    ui: &Ui,
) -> Result<Vec<PhaseSummary>> {
    cfg.validate()?;
    {
        let _stage = ui.stage("Warm up detector");
        backend.warm_up()?;
    }

    let mut summaries = Vec::with_capacity(cfg.phases.len());
    for phase in &cfg.phases {
        summaries.push(run_phase(cfg, backend, ui, phase)?);
    }
    Ok(summaries)
}

fn run_phase(
    cfg: &DetectJobConfig,
    backend: &mut dyn DetectorBackend,
    ui: &Ui,
    phase: &str,
) -> Result<PhaseSummary> {
    let phase_input = cfg.input_root.join(phase);
    let annotated_dir = cfg.output_root.join(format!("annotated_{phase}"));
    std::fs::create_dir_all(&annotated_dir)
        .with_context(|| format!("failed to create {}", annotated_dir.display()))?;

    let files = sequence::list_frames(&phase_input)?;
    log::info!(
        "phase {}: {} frames from {}",
        phase,
        files.len(),
        phase_input.display()
    );

    let mut records = DetectionRecords::new(backend.num_classes());
    let mut detection_count = 0u64;

    let bar = ui.bar(files.len() as u64, &format!("detect {phase}"));
    for batch in files.chunks(cfg.batch_size) {
        let frames = batch
            .iter()
            .map(|path| sequence::load_frame(path))
            .collect::<Result<Vec<Frame>>>()?;
        let results = backend.detect_batch(&frames)?;

        for ((path, frame), detections) in batch.iter().zip(&frames).zip(&results) {
            let name = sequence::file_name(path)?;
            records.ensure_entry(name);
            for detection in detections {
                records.observe(name, detection)?;
            }
            detection_count += detections.len() as u64;
            annotate::save_annotated(frame, detections, &annotated_dir.join(name))?;
            bar.inc(1);
        }
    }
    bar.finish();

    let records_path = cfg.output_root.join(format!("detections_{phase}.json"));
    records.write(&records_path)?;
    log::info!(
        "phase {}: {} detections over {} frames, records at {}",
        phase,
        detection_count,
        records.len(),
        records_path.display()
    );

    Ok(PhaseSummary {
        phase: phase.to_string(),
        frames: files.len(),
        detections: detection_count,
        records_path,
    })
}
