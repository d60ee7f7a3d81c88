use anyhow::Result;

use crate::caption::clip::Clip;

/// One captioning call: the fixed instruction plus a generation budget.
#[derive(Clone, Copy, Debug)]
pub struct CaptionRequest<'a> {
    pub prompt: &'a str,
    /// Maximum new tokens the model may generate.
    pub max_new_tokens: usize,
}

/// Vision-language captioning backend.
///
/// A backend wraps one loaded model (or a connection to one). Jobs receive
/// it as an explicitly constructed handle; the stub backend makes the whole
/// captioning job testable offline.
///
/// Implementations must not retain the clip beyond the call. Per-call
/// buffers are dropped before returning so peak memory stays bounded across
/// a long run.
pub trait CaptionBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Generate assembly-state text for one clip.
    ///
    /// Returns the decoded sequences; with greedy decoding this is a single
    /// entry, but the document format keeps the list shape.
    fn describe(&mut self, clip: &Clip, request: &CaptionRequest<'_>) -> Result<Vec<String>>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
