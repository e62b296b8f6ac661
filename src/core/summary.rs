//! Summarization results.

use serde::{Deserialize, Serialize};

/// Route a summary took through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPath {
    /// Whole input fit in one window; one model call.
    Direct,
    /// Input was chunked, each chunk summarized, then reduced once.
    MapReduce,
}

impl SummaryPath {
    /// Returns the path name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::MapReduce => "map_reduce",
        }
    }
}

/// Record of input dropped by the `max_chunks` cap.
///
/// Everything past `consumed_tokens` was never shown to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truncation {
    /// Tokens in the source text.
    pub total_tokens: usize,
    /// Tokens covered by the processed chunks.
    pub consumed_tokens: usize,
    /// Tokens silently left out.
    pub dropped_tokens: usize,
}

/// Final summary with the facts of how it was produced.
///
/// # Examples
///
/// ```
/// use summarai::core::{Summary, SummaryPath};
///
/// let summary = Summary::direct("A short summary.".to_string(), 42);
/// assert_eq!(summary.path, SummaryPath::Direct);
/// assert!(!summary.is_truncated());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Summary text.
    pub text: String,

    /// Route taken.
    pub path: SummaryPath,

    /// Tokens in the source text.
    pub token_count: usize,

    /// Chunks summarized in the map phase (0 on the direct path).
    pub chunk_count: usize,

    /// Set when the input was cut by the chunk cap.
    pub truncation: Option<Truncation>,
}

impl Summary {
    /// Creates a direct-path summary.
    #[must_use]
    pub const fn direct(text: String, token_count: usize) -> Self {
        Self {
            text,
            path: SummaryPath::Direct,
            token_count,
            chunk_count: 0,
            truncation: None,
        }
    }

    /// Creates a map-reduce summary.
    #[must_use]
    pub const fn map_reduce(
        text: String,
        token_count: usize,
        chunk_count: usize,
        truncation: Option<Truncation>,
    ) -> Self {
        Self {
            text,
            path: SummaryPath::MapReduce,
            token_count,
            chunk_count,
            truncation,
        }
    }

    /// Returns true if part of the input was dropped.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncation.is_some()
    }

    /// Returns the summary text wrapped at `width` columns, one line per
    /// wrapped segment.
    #[must_use]
    pub fn wrapped(&self, width: usize) -> String {
        textwrap::wrap(&self.text, width.max(1)).join("\n")
    }
}
