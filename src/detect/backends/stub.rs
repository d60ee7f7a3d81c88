use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::detect::backend::DetectorBackend;
use crate::detect::result::Detection;

/// Bytes of digest consumed per synthesized detection.
const BYTES_PER_DETECTION: usize = 5;

/// Stub detector for tests and dry runs.
///
/// Synthesizes detections from a digest of the frame pixels: the same frame
/// always yields the same boxes, different frames almost always differ. At
/// most four classes fire per frame; higher classes keep their zero record.
pub struct StubDetector {
    num_classes: usize,
    min_confidence: f32,
}

impl StubDetector {
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            min_confidence: 0.0,
        }
    }

    /// Override the default confidence floor.
    pub fn with_floor(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }
}

impl DetectorBackend for StubDetector {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    fn detect(&mut self, pixels: &[u8], _width: u32, _height: u32) -> Result<Vec<Detection>> {
        let digest = Sha256::digest(pixels);
        let mut detections = Vec::new();

        for class_id in 0..self.num_classes.min(4) {
            let chunk = &digest[class_id * BYTES_PER_DETECTION..(class_id + 1) * BYTES_PER_DETECTION];
            // Confidence lands in (0, 1].
            let confidence = (1.0 + chunk[4] as f32) / 256.0;
            if confidence < self.min_confidence {
                continue;
            }

            let cx = 0.2 + 0.6 * (chunk[0] as f32 / 255.0);
            let cy = 0.2 + 0.6 * (chunk[1] as f32 / 255.0);
            let w = 0.05 + 0.25 * (chunk[2] as f32 / 255.0);
            let h = 0.05 + 0.25 * (chunk[3] as f32 / 255.0);

            detections.push(Detection {
                class_id,
                bbox: [
                    (cx - w / 2.0).max(0.0),
                    (cy - h / 2.0).max(0.0),
                    (cx + w / 2.0).min(1.0),
                    (cy + h / 2.0).min(1.0),
                ],
                confidence,
            });
        }
        Ok(detections)
    }
}
