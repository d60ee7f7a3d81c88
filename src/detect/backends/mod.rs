//! Detector backend implementations and construction.

pub mod stub;
#[cfg(feature = "backend-tract")]
pub mod tract;

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::detect::backend::DetectorBackend;

pub use stub::StubDetector;
#[cfg(feature = "backend-tract")]
pub use tract::TractDetector;

/// Everything needed to construct a detector backend.
#[derive(Clone, Debug)]
pub struct DetectorOptions {
    /// Weights file, required by the tract backend.
    pub weights: Option<PathBuf>,
    pub num_classes: usize,
    /// Confidence floor; candidates below it are dropped by the backend.
    pub min_confidence: f32,
    /// Model input dimensions, used by the tract backend.
    pub input_width: u32,
    pub input_height: u32,
}

/// Construct a detector backend by name.
pub fn build_detector(name: &str, options: &DetectorOptions) -> Result<Box<dyn DetectorBackend>> {
    if options.num_classes == 0 {
        return Err(anyhow!("detector must have at least one class"));
    }
    match name {
        "stub" => Ok(Box::new(
            StubDetector::new(options.num_classes).with_floor(options.min_confidence),
        )),
        "tract" => build_tract(options),
        other => Err(anyhow!(
            "unknown detector backend '{}'; expected stub or tract",
            other
        )),
    }
}

#[cfg(feature = "backend-tract")]
fn build_tract(options: &DetectorOptions) -> Result<Box<dyn DetectorBackend>> {
    let weights = options
        .weights
        .as_ref()
        .ok_or_else(|| anyhow!("the tract backend requires a weights path"))?;
    Ok(Box::new(
        tract::TractDetector::new(
            weights,
            options.input_width,
            options.input_height,
            options.num_classes,
        )?
        .with_floor(options.min_confidence),
    ))
}

#[cfg(not(feature = "backend-tract"))]
fn build_tract(_options: &DetectorOptions) -> Result<Box<dyn DetectorBackend>> {
    Err(anyhow!(
        "the tract backend requires the backend-tract feature"
    ))
}
