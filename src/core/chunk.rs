//! Chunk representation for the map phase.
//!
//! A chunk is a contiguous window of the tokenized input, decoded back to
//! text. Chunks are request-scoped and never persisted.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A decoded token window of the source text.
///
/// # Examples
///
/// ```
/// use summarai::core::Chunk;
///
/// let chunk = Chunk::new(0, 0..800, "Some decoded text".to_string());
/// assert_eq!(chunk.token_count(), 800);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Sequential index in original order (0-based).
    pub index: usize,

    /// Token range in the source token sequence.
    pub token_range: Range<usize>,

    /// Decoded text of the window.
    pub text: String,
}

impl Chunk {
    /// Creates a new chunk.
    #[must_use]
    pub const fn new(index: usize, token_range: Range<usize>, text: String) -> Self {
        Self {
            index,
            token_range,
            text,
        }
    }

    /// Returns the number of tokens in the window.
    #[must_use]
    pub const fn token_count(&self) -> usize {
        self.token_range.end - self.token_range.start
    }

    /// Returns the first token offset.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.token_range.start
    }

    /// Returns the offset one past the last token.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.token_range.end
    }

    /// Returns a preview of the text (first `max_chars` characters).
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }
}
