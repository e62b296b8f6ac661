//! Deterministic fallback summary service.
//!
//! Provides a character-level tokenizer and an extractive lead-sentence
//! summarizer so the pipeline runs without model weights. Output is a
//! prefix of the input's sentences, not an abstractive summary.

use crate::Result;
use crate::error::ServiceError;
use crate::service::{LengthBounds, SummaryService, TokenId};
use unicode_segmentation::UnicodeSegmentation;

/// Input window of the fallback, matching BART-large-CNN.
pub const FALLBACK_MAX_INPUT_TOKENS: usize = 1024;

/// Character-level extractive summarizer.
///
/// Token ids are Unicode scalar values, so `detokenize(tokenize(s)) == s`
/// for every string and any window of ids decodes to valid text.
///
/// Summaries take whole sentences in order while they fit in
/// `max_length` characters. If that leaves the summary shorter than
/// `min_length`, the next sentence is cut at a word boundary to fill the
/// remaining room.
///
/// # Examples
///
/// ```
/// use summarai::service::{FallbackService, LengthBounds, SummaryService};
///
/// let service = FallbackService::new();
/// let text = "First sentence here. Second one follows. Third is last.";
/// let summary = service.summarize(text, LengthBounds::new(45, 10)).unwrap();
/// assert_eq!(summary, "First sentence here. Second one follows.");
/// ```
#[derive(Debug, Clone)]
pub struct FallbackService {
    max_input_tokens: usize,
}

impl Default for FallbackService {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackService {
    /// Creates a fallback service with the default input window.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_input_tokens: FALLBACK_MAX_INPUT_TOKENS,
        }
    }

    /// Creates a fallback service with a custom input window.
    #[must_use]
    pub const fn with_max_input_tokens(max_input_tokens: usize) -> Self {
        Self { max_input_tokens }
    }

    /// Selects leading sentences within the bounds.
    fn extract(text: &str, bounds: LengthBounds) -> String {
        let mut sentences: Vec<&str> = text
            .unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if sentences.is_empty() {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return String::new();
            }
            sentences.push(trimmed);
        }

        let mut summary = String::new();
        let mut used = 0;
        let mut rest = sentences.into_iter();
        let mut pending = None;

        for sentence in rest.by_ref() {
            let sep = usize::from(!summary.is_empty());
            let len = sentence.chars().count();
            if used + sep + len > bounds.max_length {
                pending = Some(sentence);
                break;
            }
            if sep == 1 {
                summary.push(' ');
            }
            summary.push_str(sentence);
            used += sep + len;
        }

        if used < bounds.min_length || summary.is_empty() {
            if let Some(next) = pending {
                let sep = usize::from(!summary.is_empty());
                let room = bounds.max_length.saturating_sub(used + sep);
                let cut = cut_at_word(next, room);
                if !cut.is_empty() {
                    if sep == 1 {
                        summary.push(' ');
                    }
                    summary.push_str(cut);
                }
            }
        }

        summary
    }
}

/// Returns the longest prefix of at most `max_chars` characters ending at a
/// word boundary, or a hard cut when the first word is already too long.
fn cut_at_word(s: &str, max_chars: usize) -> &str {
    let Some((limit, _)) = s.char_indices().nth(max_chars) else {
        return s;
    };
    let head = &s[..limit];
    match head.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => head[..pos].trim_end(),
        _ => head,
    }
}

impl SummaryService for FallbackService {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn max_input_tokens(&self) -> Option<usize> {
        Some(self.max_input_tokens)
    }

    fn tokenize(&self, text: &str) -> Result<Vec<TokenId>> {
        Ok(text.chars().map(TokenId::from).collect())
    }

    fn detokenize(&self, tokens: &[TokenId]) -> Result<String> {
        Ok(tokens
            .iter()
            .map(|&id| char::from_u32(id).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect())
    }

    fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String> {
        let tokens = text.chars().count();
        if tokens > self.max_input_tokens {
            return Err(ServiceError::InputTooLong {
                tokens,
                max: self.max_input_tokens,
            }
            .into());
        }
        Ok(Self::extract(text, bounds))
    }
}
