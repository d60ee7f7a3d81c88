//! Caption run output document.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::caption::window::WindowParams;

/// Run metadata stored alongside the outputs, enough to reproduce the
/// windowing of the run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptionRunInfo {
    pub num_frames: usize,
    pub frames_before: usize,
    pub frames_after: usize,
    pub interval: usize,
    pub offset: usize,
    pub prompt: String,
}

/// The captioning job's output document: run metadata plus generated text
/// keyed by center-frame name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptionRun {
    pub info: CaptionRunInfo,
    pub outputs: BTreeMap<String, Vec<String>>,
}

impl CaptionRun {
    pub fn new(params: &WindowParams, prompt: &str) -> Self {
        Self {
            info: CaptionRunInfo {
                num_frames: params.num_frames,
                frames_before: params.frames_before,
                frames_after: params.frames_after,
                interval: params.interval,
                offset: params.offset,
                prompt: prompt.to_string(),
            },
            outputs: BTreeMap::new(),
        }
    }

    /// Store the generated sequences for one center frame.
    pub fn record(&mut self, center_name: &str, sequences: Vec<String>) {
        self.outputs.insert(center_name.to_string(), sequences);
    }

    /// Rewrite the full document.
    ///
    /// Called after every window, so a crash mid-run loses at most the
    /// window in flight.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write captions to {}", path.display()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read captions from {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid caption JSON in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_round_trips() {
        let params = WindowParams {
            num_frames: 16,
            frames_before: 32,
            frames_after: 32,
            interval: 100,
            offset: 0,
        };
        let mut run = CaptionRun::new(&params, "describe the assembly");
        run.record("frame_0032_05.jpg", vec!["base installed".to_string()]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("captions.json");
        run.write(&path).unwrap();

        let loaded = CaptionRun::load(&path).unwrap();
        assert_eq!(loaded, run);
        assert_eq!(loaded.info.num_frames, 16);
        assert_eq!(
            loaded.outputs["frame_0032_05.jpg"],
            vec!["base installed".to_string()]
        );
    }
}
