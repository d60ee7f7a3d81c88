//! Per-job configuration.
//!
//! Each binary assembles one of these structs from its CLI arguments and
//! validates it before the job starts. Defaults mirror the values the
//! recorded datasets were produced with.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::caption::WindowParams;

pub const DEFAULT_BATCH_SIZE: usize = 256;
/// Very low floor: weak detections still count, the records fold keeps the
/// best per class anyway.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.0001;
pub const DEFAULT_NUM_CLASSES: usize = 12;

pub const DEFAULT_NUM_FRAMES: usize = 16;
pub const DEFAULT_FRAMES_BEFORE: usize = 32;
pub const DEFAULT_FRAMES_AFTER: usize = 32;
pub const DEFAULT_INTERVAL: usize = 100;
pub const DEFAULT_MAX_NEW_TOKENS: usize = 384;

pub const DEFAULT_SYNTHETIC_WIDTH: u32 = 1280;
pub const DEFAULT_SYNTHETIC_HEIGHT: u32 = 720;

/// Configuration for the detection-record builder.
#[derive(Clone, Debug)]
pub struct DetectJobConfig {
    /// Root folder containing one sub-folder of frames per phase.
    pub input_root: PathBuf,
    /// Output root for records JSON and annotated frame copies.
    pub output_root: PathBuf,
    /// Phase sub-folders to process, e.g. `train`, `test`.
    pub phases: Vec<String>,
    /// Frames handed to the detector per batch; the final batch may be
    /// smaller.
    pub batch_size: usize,
}

impl DetectJobConfig {
    pub fn validate(&self) -> Result<()> {
        if self.phases.is_empty() {
            return Err(anyhow!("at least one phase is required"));
        }
        if self.phases.iter().any(|phase| phase.trim().is_empty()) {
            return Err(anyhow!("phase names must not be empty"));
        }
        if self.batch_size == 0 {
            return Err(anyhow!("batch size must be greater than zero"));
        }
        Ok(())
    }
}

/// Configuration for the clip-captioning job.
#[derive(Clone, Debug)]
pub struct CaptionJobConfig {
    /// Folder of frames forming one sorted sequence.
    pub input_dir: PathBuf,
    /// Output JSON document path, rewritten after every window.
    pub output_path: PathBuf,
    pub window: WindowParams,
    /// Instruction text sent with every clip.
    pub prompt: String,
    /// Generation budget per call.
    pub max_new_tokens: usize,
}

impl CaptionJobConfig {
    pub fn validate(&self) -> Result<()> {
        self.window.validate()?;
        if self.prompt.trim().is_empty() {
            return Err(anyhow!("caption prompt must not be empty"));
        }
        if self.max_new_tokens == 0 {
            return Err(anyhow!("max new tokens must be greater than zero"));
        }
        Ok(())
    }
}

/// Configuration for the synthetic-annotation converter.
#[derive(Clone, Debug)]
pub struct SyntheticJobConfig {
    /// COCO-style annotations file.
    pub annotations_path: PathBuf,
    /// Folder holding the source images named by the annotations file.
    pub image_dir: PathBuf,
    /// Output root; `images/` and `labels/` are created beneath it.
    pub output_root: PathBuf,
    /// Fixed dimensions of every synthetic image.
    pub image_width: u32,
    pub image_height: u32,
}

impl SyntheticJobConfig {
    pub fn validate(&self) -> Result<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(anyhow!("image dimensions must be greater than zero"));
        }
        Ok(())
    }
}

/// Configuration for the label vectorizer.
#[derive(Clone, Debug)]
pub struct VectorizeJobConfig {
    /// Records JSON produced by the detection-record builder.
    pub records_path: PathBuf,
    /// Output dataset JSON path.
    pub output_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> WindowParams {
        WindowParams {
            num_frames: DEFAULT_NUM_FRAMES,
            frames_before: DEFAULT_FRAMES_BEFORE,
            frames_after: DEFAULT_FRAMES_AFTER,
            interval: DEFAULT_INTERVAL,
            offset: 0,
        }
    }

    #[test]
    fn detect_config_rejects_empty_phases_and_zero_batch() {
        let mut cfg = DetectJobConfig {
            input_root: PathBuf::from("in"),
            output_root: PathBuf::from("out"),
            phases: vec![],
            batch_size: DEFAULT_BATCH_SIZE,
        };
        assert!(cfg.validate().is_err());

        cfg.phases = vec!["test".to_string()];
        assert!(cfg.validate().is_ok());

        cfg.batch_size = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn caption_config_rejects_empty_prompt_and_zero_budget() {
        let mut cfg = CaptionJobConfig {
            input_dir: PathBuf::from("frames"),
            output_path: PathBuf::from("captions.json"),
            window: window(),
            prompt: "describe the assembly".to_string(),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        };
        assert!(cfg.validate().is_ok());

        cfg.prompt = "   ".to_string();
        assert!(cfg.validate().is_err());

        cfg.prompt = "describe the assembly".to_string();
        cfg.max_new_tokens = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn synthetic_config_rejects_zero_dimensions() {
        let mut cfg = SyntheticJobConfig {
            annotations_path: PathBuf::from("labels_coco.json"),
            image_dir: PathBuf::from("images"),
            output_root: PathBuf::from("out"),
            image_width: DEFAULT_SYNTHETIC_WIDTH,
            image_height: DEFAULT_SYNTHETIC_HEIGHT,
        };
        assert!(cfg.validate().is_ok());

        cfg.image_width = 0;
        assert!(cfg.validate().is_err());
    }
}
