//! Clip assembly: uniform frame sampling and decoding.

use std::path::PathBuf;

use anyhow::Result;

use crate::sequence::{self, Frame};

/// A fixed-length sequence of sampled RGB frames fed to the captioner in
/// one call.
#[derive(Clone, Debug)]
pub struct Clip {
    pub frames: Vec<Frame>,
}

impl Clip {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Uniformly sample `count` indices across `0..len`.
///
/// Linear interpolation between the first and last index, rounded to
/// nearest. The result is non-decreasing and covers both endpoints;
/// indices repeat when the window holds fewer frames than `count`.
pub fn sample_indices(len: usize, count: usize) -> Vec<usize> {
    if len == 0 || count == 0 {
        return Vec::new();
    }
    if count == 1 || len == 1 {
        return vec![0; count];
    }

    let last = (len - 1) as f64;
    let step = last / (count - 1) as f64;
    (0..count)
        .map(|i| (i as f64 * step).round() as usize)
        .collect()
}

/// Decode `num_frames` uniformly sampled frames from a window of paths.
pub fn load_clip(window_paths: &[PathBuf], num_frames: usize) -> Result<Clip> {
    let indices = sample_indices(window_paths.len(), num_frames);
    let mut frames = Vec::with_capacity(indices.len());
    for idx in indices {
        frames.push(sequence::load_frame(&window_paths[idx])?);
    }
    Ok(Clip { frames })
}
