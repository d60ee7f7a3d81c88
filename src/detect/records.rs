//! Per-frame per-class best-record accumulation.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::detect::result::{BoxRecord, Detection};

/// Detection records for a set of frames.
///
/// Each frame maps to exactly `num_classes` records. A record is either the
/// all-zero default or the maximum-confidence detection seen for that
/// class; the comparison is strict, so confidence ties keep the first box
/// seen.
#[derive(Clone, Debug)]
pub struct DetectionRecords {
    num_classes: usize,
    records: BTreeMap<String, Vec<BoxRecord>>,
}

impl DetectionRecords {
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            records: BTreeMap::new(),
        }
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Number of frames with an entry.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Create the default entry for a frame.
    ///
    /// Frames with zero detections still serialize a full row of zero
    /// records, so every consumer sees a fixed-width array.
    pub fn ensure_entry(&mut self, frame_name: &str) {
        self.records
            .entry(frame_name.to_string())
            .or_insert_with(|| vec![BoxRecord::default(); self.num_classes]);
    }

    /// Fold one detection into a frame's records.
    pub fn observe(&mut self, frame_name: &str, detection: &Detection) -> Result<()> {
        if detection.class_id >= self.num_classes {
            return Err(anyhow!(
                "detection class {} out of range for {} classes",
                detection.class_id,
                self.num_classes
            ));
        }
        let entry = self
            .records
            .entry(frame_name.to_string())
            .or_insert_with(|| vec![BoxRecord::default(); self.num_classes]);
        let record = &mut entry[detection.class_id];
        if detection.confidence > record.conf {
            record.bbox = detection.bbox;
            record.conf = detection.confidence;
        }
        Ok(())
    }

    pub fn get(&self, frame_name: &str) -> Option<&[BoxRecord]> {
        self.records.get(frame_name).map(|records| records.as_slice())
    }

    pub fn as_map(&self) -> &BTreeMap<String, Vec<BoxRecord>> {
        &self.records
    }

    /// Serialize the records map as a JSON object keyed by frame name.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(&self.records)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write records to {}", path.display()))
    }

    /// Read a records map written by `write`.
    pub fn load_map(path: &Path) -> Result<BTreeMap<String, Vec<BoxRecord>>> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read records from {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid records JSON in {}", path.display()))
    }
}
