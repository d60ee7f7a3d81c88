//! Stage vectors: flatten detection records and attach stage labels.
//!
//! Consumes the detection-record builder's JSON. Each frame's per-class
//! records flatten into one feature vector (four box coordinates then the
//! confidence, per class, in class order) and the frame name's stage suffix
//! selects the 12-bit completion label.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::detect::records::DetectionRecords;
use crate::detect::result::BoxRecord;
use crate::sequence;
use crate::stage::LABEL_BITS;

/// Feature values per class: four box coordinates plus the confidence.
pub const FEATURES_PER_CLASS: usize = 5;

/// The vectorizer's output: parallel arrays, one entry per frame, in
/// deterministic name order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageDataset {
    pub names: Vec<String>,
    pub features: Vec<Vec<f32>>,
    pub labels: Vec<[u8; LABEL_BITS]>,
}

impl StageDataset {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write dataset to {}", path.display()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset from {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid dataset JSON in {}", path.display()))
    }
}

/// Flatten one frame's per-class records into a feature vector.
pub fn feature_vector(records: &[BoxRecord]) -> Vec<f32> {
    let mut features = Vec::with_capacity(records.len() * FEATURES_PER_CLASS);
    for record in records {
        features.extend_from_slice(&record.bbox);
        features.push(record.conf);
    }
    features
}

/// Build the dataset from a records map.
///
/// Every frame name must carry a valid stage suffix; a frame that does not
/// aborts the build with the offending name in the error.
pub fn build_dataset(records: &BTreeMap<String, Vec<BoxRecord>>) -> Result<StageDataset> {
    let mut dataset = StageDataset {
        names: Vec::with_capacity(records.len()),
        features: Vec::with_capacity(records.len()),
        labels: Vec::with_capacity(records.len()),
    };

    let mut expected_len: Option<usize> = None;
    for (name, row) in records {
        if let Some(expected) = expected_len {
            if row.len() != expected {
                return Err(anyhow!(
                    "frame {} has {} class records, expected {}",
                    name,
                    row.len(),
                    expected
                ));
            }
        } else {
            expected_len = Some(row.len());
        }

        let stage = sequence::stage_suffix(name)?;
        dataset.names.push(name.clone());
        dataset.features.push(feature_vector(row));
        dataset.labels.push(stage.label());
    }
    Ok(dataset)
}

/// Read a records JSON and build the dataset in one step.
pub fn vectorize_records(records_path: &Path) -> Result<StageDataset> {
    let records = DetectionRecords::load_map(records_path)?;
    build_dataset(&records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(conf: f32) -> BoxRecord {
        BoxRecord {
            bbox: [0.1, 0.2, 0.3, 0.4],
            conf,
        }
    }

    #[test]
    fn features_are_five_per_class_in_order() {
        let row = vec![record(0.9), BoxRecord::default(), record(0.4)];
        let features = feature_vector(&row);

        assert_eq!(features.len(), 3 * FEATURES_PER_CLASS);
        assert_eq!(&features[..5], &[0.1, 0.2, 0.3, 0.4, 0.9]);
        assert_eq!(&features[5..10], &[0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(features[14], 0.4);
    }

    #[test]
    fn dataset_pairs_features_with_stage_labels() {
        let mut records = BTreeMap::new();
        records.insert(
            "rec_a_00001_frame_0000_05.jpg".to_string(),
            vec![record(0.9), record(0.8)],
        );
        records.insert(
            "rec_a_00001_frame_0001_09.jpg".to_string(),
            vec![record(0.7), record(0.6)],
        );

        let dataset = build_dataset(&records).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.features[0].len(), 2 * FEATURES_PER_CLASS);
        assert_eq!(dataset.labels[0], [1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(dataset.labels[1], [1, 1, 1, 1, 0, 1, 1, 1, 1, 0, 0, 0]);
    }

    #[test]
    fn invalid_stage_suffix_aborts_the_build() {
        let mut records = BTreeMap::new();
        records.insert("rec_a_00001_frame_0000_47.jpg".to_string(), vec![record(0.9)]);

        let err = build_dataset(&records).unwrap_err();
        assert!(format!("{:#}", err).contains("rec_a_00001_frame_0000_47.jpg"));
    }

    #[test]
    fn ragged_record_rows_are_rejected() {
        let mut records = BTreeMap::new();
        records.insert(
            "rec_a_00001_frame_0000_01.jpg".to_string(),
            vec![record(0.9), record(0.8)],
        );
        records.insert(
            "rec_a_00001_frame_0001_02.jpg".to_string(),
            vec![record(0.7)],
        );

        assert!(build_dataset(&records).is_err());
    }
}
