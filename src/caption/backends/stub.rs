use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::caption::backend::{CaptionBackend, CaptionRequest};
use crate::caption::clip::Clip;

/// Canned assembly-state fragments the stub picks from.
const PHRASES: [&str; 6] = [
    "base and front chassis installed",
    "rear chassis attached, wheels still loose",
    "front wheel assembly mounted",
    "rear wheel assembly mounted",
    "front bracket and screw in place",
    "only loose parts visible, no assembly started",
];

/// Stub captioner for tests and dry runs.
///
/// Digests the clip pixels and picks a canned description, so the same clip
/// always captions identically and no model is needed.
pub struct StubCaptioner {
    calls: u64,
}

impl StubCaptioner {
    pub fn new() -> Self {
        Self { calls: 0 }
    }

    /// Number of describe calls made so far.
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl Default for StubCaptioner {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptionBackend for StubCaptioner {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn describe(&mut self, clip: &Clip, request: &CaptionRequest<'_>) -> Result<Vec<String>> {
        self.calls += 1;

        let mut hasher = Sha256::new();
        for frame in &clip.frames {
            hasher.update(frame.width.to_le_bytes());
            hasher.update(frame.height.to_le_bytes());
            hasher.update(&frame.pixels);
        }
        let digest = hasher.finalize();

        let phrase = PHRASES[digest[0] as usize % PHRASES.len()];
        let text = format!("{} frames: {}", clip.len(), phrase);

        // Honor the generation budget the way a model would, one word per
        // token at worst.
        let truncated: Vec<&str> = text
            .split_whitespace()
            .take(request.max_new_tokens)
            .collect();
        Ok(vec![truncated.join(" ")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Frame;

    fn clip(seed: u8) -> Clip {
        let frame = Frame::new(4, 4, vec![seed; 4 * 4 * 3]).unwrap();
        Clip {
            frames: vec![frame.clone(), frame],
        }
    }

    #[test]
    fn same_clip_same_caption() {
        let mut backend = StubCaptioner::new();
        let request = CaptionRequest {
            prompt: "describe",
            max_new_tokens: 64,
        };
        let a = backend.describe(&clip(7), &request).unwrap();
        let b = backend.describe(&clip(7), &request).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
        assert!(a[0].starts_with("2 frames:"));
    }

    #[test]
    fn budget_truncates_output() {
        let mut backend = StubCaptioner::new();
        let request = CaptionRequest {
            prompt: "describe",
            max_new_tokens: 2,
        };
        let out = backend.describe(&clip(9), &request).unwrap();
        assert_eq!(out[0].split_whitespace().count(), 2);
    }
}
