//! Fixed-window token chunking.
//!
//! Splits a token sequence into non-overlapping windows of a fixed size,
//! stopping after a maximum number of windows. Anything past the last
//! window is dropped.

use crate::Result;
use crate::chunking::{DEFAULT_CHUNK_TOKENS, DEFAULT_MAX_CHUNKS};
use crate::core::{Chunk, Truncation};
use crate::error::ChunkingError;
use crate::service::{SummaryService, TokenId};
use serde::Serialize;
use std::ops::Range;

/// Token windows selected for one input.
///
/// Windows start at offset 0, advance by `chunk_tokens`, never overlap and
/// number at most `max_chunks`. Only the last window of an untruncated
/// plan may be shorter than `chunk_tokens`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkPlan {
    /// Tokens in the source sequence.
    pub total_tokens: usize,
    /// Window size in tokens.
    pub chunk_tokens: usize,
    /// Window cap.
    pub max_chunks: usize,
    /// Selected windows in order.
    pub windows: Vec<Range<usize>>,
}

impl ChunkPlan {
    /// Number of windows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Returns true if no window was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Tokens covered by the windows.
    #[must_use]
    pub fn consumed_tokens(&self) -> usize {
        self.windows.last().map_or(0, |w| w.end)
    }

    /// Tokens past the last window.
    #[must_use]
    pub fn dropped_tokens(&self) -> usize {
        self.total_tokens - self.consumed_tokens()
    }

    /// Returns true if the cap cut off part of the input.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.dropped_tokens() > 0
    }

    /// Returns the truncation record, if any input was dropped.
    #[must_use]
    pub fn truncation(&self) -> Option<Truncation> {
        self.is_truncated().then(|| Truncation {
            total_tokens: self.total_tokens,
            consumed_tokens: self.consumed_tokens(),
            dropped_tokens: self.dropped_tokens(),
        })
    }
}

/// Fixed-size, non-overlapping token window chunker.
///
/// # Examples
///
/// ```
/// use summarai::chunking::FixedWindowChunker;
///
/// let chunker = FixedWindowChunker::new(800, 5).unwrap();
/// let plan = chunker.plan(4100);
/// assert_eq!(plan.len(), 5);
/// assert_eq!(plan.consumed_tokens(), 4000);
/// assert_eq!(plan.dropped_tokens(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWindowChunker {
    chunk_tokens: usize,
    max_chunks: usize,
}

impl Default for FixedWindowChunker {
    fn default() -> Self {
        Self {
            chunk_tokens: DEFAULT_CHUNK_TOKENS,
            max_chunks: DEFAULT_MAX_CHUNKS,
        }
    }
}

impl FixedWindowChunker {
    /// Creates a chunker with the given window size and cap.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkingError::InvalidConfig`] if either value is zero.
    pub fn new(chunk_tokens: usize, max_chunks: usize) -> Result<Self> {
        if chunk_tokens == 0 {
            return Err(ChunkingError::InvalidConfig {
                reason: "chunk_tokens must be > 0".to_string(),
            }
            .into());
        }
        if max_chunks == 0 {
            return Err(ChunkingError::InvalidConfig {
                reason: "max_chunks must be > 0".to_string(),
            }
            .into());
        }
        Ok(Self {
            chunk_tokens,
            max_chunks,
        })
    }

    /// Window size in tokens.
    #[must_use]
    pub const fn chunk_tokens(&self) -> usize {
        self.chunk_tokens
    }

    /// Maximum number of windows.
    #[must_use]
    pub const fn max_chunks(&self) -> usize {
        self.max_chunks
    }

    /// Returns true if `total_tokens` fits in a single window.
    #[must_use]
    pub const fn fits(&self, total_tokens: usize) -> bool {
        total_tokens <= self.chunk_tokens
    }

    /// Plans windows over a sequence of `total_tokens` tokens.
    #[must_use]
    pub fn plan(&self, total_tokens: usize) -> ChunkPlan {
        let windows = (0..total_tokens)
            .step_by(self.chunk_tokens)
            .take(self.max_chunks)
            .map(|start| start..(start + self.chunk_tokens).min(total_tokens))
            .collect();

        ChunkPlan {
            total_tokens,
            chunk_tokens: self.chunk_tokens,
            max_chunks: self.max_chunks,
            windows,
        }
    }

    /// Decodes the windows of `plan` into chunks through `service`.
    ///
    /// # Errors
    ///
    /// Propagates any detokenization failure, or returns
    /// [`ChunkingError::InvalidConfig`] if the plan does not match `tokens`.
    pub fn decode<S: SummaryService + ?Sized>(
        plan: &ChunkPlan,
        tokens: &[TokenId],
        service: &S,
    ) -> Result<Vec<Chunk>> {
        if plan.total_tokens != tokens.len() {
            return Err(ChunkingError::InvalidConfig {
                reason: format!(
                    "plan covers {} tokens but sequence has {}",
                    plan.total_tokens,
                    tokens.len()
                ),
            }
            .into());
        }

        plan.windows
            .iter()
            .enumerate()
            .map(|(index, window)| {
                let text = service.detokenize(&tokens[window.clone()])?;
                Ok(Chunk::new(index, window.clone(), text))
            })
            .collect()
    }

    /// Plans and decodes `tokens` in one step.
    ///
    /// # Errors
    ///
    /// Propagates any detokenization failure.
    pub fn chunk<S: SummaryService + ?Sized>(
        &self,
        tokens: &[TokenId],
        service: &S,
    ) -> Result<Vec<Chunk>> {
        let plan = self.plan(tokens.len());
        Self::decode(&plan, tokens, service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::FallbackService;
    use test_case::test_case;

    #[test]
    fn test_default_chunker() {
        let chunker = FixedWindowChunker::default();
        assert_eq!(chunker.chunk_tokens(), 800);
        assert_eq!(chunker.max_chunks(), 5);
    }

    #[test]
    fn test_invalid_config() {
        assert!(FixedWindowChunker::new(0, 5).is_err());
        assert!(FixedWindowChunker::new(800, 0).is_err());
    }

    #[test_case(800, true ; "exactly one window")]
    #[test_case(801, false ; "one token over")]
    #[test_case(50, true ; "short input")]
    #[test_case(0, true ; "empty")]
    fn test_fits(total: usize, expected: bool) {
        let chunker = FixedWindowChunker::default();
        assert_eq!(chunker.fits(total), expected);
    }

    #[test_case(801, 2, 0 ; "one over the window")]
    #[test_case(1600, 2, 0 ; "two full windows")]
    #[test_case(4000, 5, 0 ; "exactly at the cap")]
    #[test_case(4100, 5, 100 ; "one hundred over the cap")]
    #[test_case(10_000, 5, 6000 ; "far over the cap")]
    fn test_plan_counts(total: usize, chunks: usize, dropped: usize) {
        let plan = FixedWindowChunker::default().plan(total);
        assert_eq!(plan.len(), chunks);
        assert_eq!(plan.dropped_tokens(), dropped);
        assert_eq!(plan.is_truncated(), dropped > 0);
    }

    #[test]
    fn test_plan_windows_are_contiguous() {
        let plan = FixedWindowChunker::new(10, 3).unwrap().plan(25);
        assert_eq!(plan.windows, vec![0..10, 10..20, 20..25]);
        assert!(plan.truncation().is_none());
    }

    #[test]
    fn test_plan_truncation_record() {
        let plan = FixedWindowChunker::new(10, 2).unwrap().plan(25);
        let truncation = plan.truncation().unwrap();
        assert_eq!(truncation.total_tokens, 25);
        assert_eq!(truncation.consumed_tokens, 20);
        assert_eq!(truncation.dropped_tokens, 5);
    }

    #[test]
    fn test_plan_empty_sequence() {
        let plan = FixedWindowChunker::default().plan(0);
        assert!(plan.is_empty());
        assert_eq!(plan.consumed_tokens(), 0);
        assert!(!plan.is_truncated());
    }

    #[test]
    fn test_chunk_decodes_in_order() {
        let service = FallbackService::new();
        let tokens = service.tokenize("abcdefghij").unwrap();
        let chunks = FixedWindowChunker::new(4, 5)
            .unwrap()
            .chunk(&tokens, &service)
            .unwrap();

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["abcd", "efgh", "ij"]);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn test_decode_rejects_mismatched_plan() {
        let service = FallbackService::new();
        let plan = FixedWindowChunker::new(4, 5).unwrap().plan(100);
        let tokens = service.tokenize("short").unwrap();
        assert!(FixedWindowChunker::decode(&plan, &tokens, &service).is_err());
    }
}
