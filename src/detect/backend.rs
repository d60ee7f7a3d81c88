use anyhow::Result;

use crate::detect::result::Detection;
use crate::sequence::Frame;

/// Object detector backend.
///
/// A backend wraps one loaded detector. Jobs receive the backend as an
/// explicitly constructed handle, so a run is testable against the stub
/// backend without any weights on disk.
///
/// Implementations must treat the pixel slice as read-only and must not
/// retain it beyond the `detect` call.
pub trait DetectorBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Number of classes the detector emits. Record arrays are sized by
    /// this.
    fn num_classes(&self) -> usize;

    /// Confidence floor; candidates below it never leave the backend.
    fn min_confidence(&self) -> f32;

    /// Run detection on one RGB8 frame.
    ///
    /// Returns every candidate at or above the backend's confidence floor,
    /// in no particular order. Class ids must be below `num_classes`.
    fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<Detection>>;

    /// Run detection on a batch of frames.
    ///
    /// Backends with real batched inference should override this; the
    /// default loops `detect` frame by frame.
    fn detect_batch(&mut self, frames: &[Frame]) -> Result<Vec<Vec<Detection>>> {
        let mut results = Vec::with_capacity(frames.len());
        for frame in frames {
            results.push(self.detect(&frame.pixels, frame.width, frame.height)?);
        }
        Ok(results)
    }

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
