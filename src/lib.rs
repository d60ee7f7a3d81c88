//! carstage - dataset preparation for toy-car assembly-state recognition.
//!
//! The pipeline is four independent batch jobs that share this library but
//! never share a runtime:
//!
//! 1. `detect_records`: run an object detector over image folders and keep
//!    the best box per class per image.
//! 2. `caption_clips`: slide a window over a sorted frame sequence and
//!    caption fixed-length sampled clips with a vision-language backend.
//! 3. `stage_vectors`: flatten detection records into feature vectors and
//!    map file-name stage indices to 12-bit completion labels.
//! 4. `synthetic_labels`: convert COCO-style synthetic annotations into
//!    per-image YOLO label files.
//!
//! Model weights never load inside this crate. Detection and captioning go
//! through the `DetectorBackend` and `CaptionBackend` traits; jobs receive
//! an explicitly constructed backend, so every job runs against the stub
//! backends in tests.
//!
//! # Module Structure
//!
//! - `sequence`: frame listing, natural ordering, file-name metadata
//! - `stage`: the stage-to-label table and stage index handling
//! - `detect`: detector backends and the detection-record job
//! - `caption`: caption backends, clips, windows, and the captioning job
//! - `vectorize`: detection records to (feature, label) dataset
//! - `synthetic`: COCO-style annotations to YOLO label files
//! - `config`: per-job configuration and validation
//! - `ui`: stderr stage and progress reporting

pub mod caption;
pub mod config;
pub mod detect;
pub mod sequence;
pub mod stage;
pub mod synthetic;
pub mod ui;
pub mod vectorize;

pub use caption::{CaptionBackend, CaptionRequest, CaptionRun, Clip, WindowParams};
pub use detect::{BoxRecord, Detection, DetectionRecords, DetectorBackend};
pub use sequence::{list_frames, session_prefix, stage_suffix, Frame, SESSION_PREFIX_LEN};
pub use stage::{StageIndex, LABEL_BITS, STAGE_COUNT, STAGE_LABELS};
