//! Evidence linking for detected signals.
//!
//! Every signal points back to the span of the normalized answer that
//! triggered it. The rewriter uses these spans to lift the user's own
//! sentences into the structured answer.

use serde::{Deserialize, Serialize};

/// A span of answer text supporting a detected signal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Evidence {
    /// What this evidence supports
    pub claim: String,

    /// Pointer to the location (e.g., "answer[47:72]")
    pub pointer: String,

    /// Byte offset where the span starts
    pub start: usize,

    /// Byte offset where the span ends (exclusive)
    pub end: usize,
}

impl Evidence {
    /// Create evidence from a span of the answer.
    pub fn from_answer(claim: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            claim: claim.into(),
            pointer: format!("answer[{}:{}]", start, end),
            start,
            end,
        }
    }

    /// The quoted text this evidence points at, if the span is valid for `text`.
    pub fn quote<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }

    /// Whether this span lies inside `[start, end)`.
    pub fn within(&self, start: usize, end: usize) -> bool {
        self.start >= start && self.end <= end
    }
}
