#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tract_onnx::prelude::*;

use crate::detect::backend::DetectorBackend;
use crate::detect::result::Detection;

/// Tract-based detector for ONNX weights.
///
/// Expects a YOLO-style export: one output tensor of candidate rows
/// `[cx, cy, w, h, objectness, class scores...]` in normalized coordinates.
/// No non-maximum suppression runs here; the records fold downstream keeps
/// only the best box per class, which subsumes it for this output shape.
pub struct TractDetector {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>>,
    width: u32,
    height: u32,
    num_classes: usize,
    min_confidence: f32,
}

impl TractDetector {
    /// Load an ONNX model from disk and prepare it for inference.
    pub fn new<P: AsRef<Path>>(
        model_path: P,
        width: u32,
        height: u32,
        num_classes: usize,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| format!("failed to load ONNX model from {}", model_path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, 3, height as usize, width as usize),
                ),
            )
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize ONNX model")?
            .into_runnable()
            .context("failed to build runnable ONNX model")?;

        Ok(Self {
            model,
            width,
            height,
            num_classes,
            min_confidence: 0.0,
        })
    }

    /// Override the default confidence floor.
    pub fn with_floor(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    fn build_input(&self, pixels: &[u8], width: u32, height: u32) -> Result<Tensor> {
        if width != self.width || height != self.height {
            return Err(anyhow!(
                "frame size {}x{} does not match model input {}x{}",
                width,
                height,
                self.width,
                self.height
            ));
        }

        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;

        if pixels.len() != expected_len {
            return Err(anyhow!(
                "expected {} RGB bytes, received {}",
                expected_len,
                pixels.len()
            ));
        }

        let width = width as usize;
        let input = tract_ndarray::Array4::from_shape_fn(
            (1, 3, height as usize, width),
            |(_, channel, y, x)| {
                let idx = (y * width + x) * 3 + channel;
                pixels[idx] as f32 / 255.0
            },
        );

        Ok(input.into_tensor())
    }

    fn decode_output(&self, outputs: TVec<TValue>) -> Result<Vec<Detection>> {
        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?;
        let view = output
            .to_array_view::<f32>()
            .context("model output tensor was not f32")?;
        let flat = view
            .as_slice()
            .ok_or_else(|| anyhow!("model output tensor was not contiguous"))?;

        let row_len = 5 + self.num_classes;
        if flat.len() % row_len != 0 {
            return Err(anyhow!(
                "model output length {} is not a multiple of row length {}",
                flat.len(),
                row_len
            ));
        }

        let mut detections = Vec::new();
        for row in flat.chunks_exact(row_len) {
            let objectness = row[4];
            let (class_id, class_score) = row[5..]
                .iter()
                .enumerate()
                .fold((0usize, f32::NEG_INFINITY), |best, (idx, score)| {
                    if *score > best.1 {
                        (idx, *score)
                    } else {
                        best
                    }
                });
            let confidence = objectness * class_score;
            if !confidence.is_finite() || confidence < self.min_confidence {
                continue;
            }

            let [cx, cy, w, h] = [row[0], row[1], row[2], row[3]];
            detections.push(Detection {
                class_id,
                bbox: [
                    (cx - w / 2.0).clamp(0.0, 1.0),
                    (cy - h / 2.0).clamp(0.0, 1.0),
                    (cx + w / 2.0).clamp(0.0, 1.0),
                    (cy + h / 2.0).clamp(0.0, 1.0),
                ],
                confidence,
            });
        }
        Ok(detections)
    }
}

impl DetectorBackend for TractDetector {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<Detection>> {
        let input = self.build_input(pixels, width, height)?;
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("ONNX inference failed")?;
        self.decode_output(outputs)
    }
}
