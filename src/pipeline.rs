//! The full repair pipeline: subscript rewriting, then byte-run decoding.
use std::borrow::Cow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Log a before/after preview for every call that changes its input.
    /// Replaces the old process-wide debug toggle.
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Pipeline { config }
    }
    pub fn verbose() -> Self {
        Pipeline::new(PipelineConfig { verbose: true })
    }

    /// Repair one text unit. Total and pure: never panics, never errors,
    /// always terminates; the worst case leaves a corrupted escape visible
    /// exactly as it arrived.
    pub fn normalize(&self, text: &str) -> String {
        let rewritten = crate::subscript::rewrite(text);
        let decoded = crate::hexbyte::decode(&rewritten);
        if self.config.verbose && decoded != text {
            log::debug!(
                "normalized {:?} -> {:?}",
                preview(text),
                preview(&decoded)
            );
        }
        decoded.into_owned()
    }
}

/// One-shot repair with the default configuration.
pub fn normalize(text: &str) -> String {
    Pipeline::default().normalize(text)
}

/// Truncated preview for log lines, cut on a character boundary.
fn preview(text: &str) -> Cow<'_, str> {
    const MAX_CHARS: usize = 50;
    match text.char_indices().nth(MAX_CHARS) {
        None => Cow::Borrowed(text),
        Some((ix, _)) => Cow::Owned(format!("{}...", &text[..ix])),
    }
}

///////////////////////////////////////////////////////////////////////////////
// TESTS
///////////////////////////////////////////////////////////////////////////////
