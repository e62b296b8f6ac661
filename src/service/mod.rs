//! Summarization service boundary.
//!
//! The pretrained model and its tokenizer are opaque to the rest of the
//! crate. They are reached only through the [`SummaryService`] trait, which
//! is constructed once at startup and passed by reference to whoever needs
//! it.
//!
//! A deterministic [`FallbackService`] is always available so the pipeline
//! can run without model weights.

mod fallback;

pub use fallback::FallbackService;

use crate::Result;
use serde::{Deserialize, Serialize};

/// Identifier of a single token in the service's vocabulary.
pub type TokenId = u32;

/// Output length bounds for one summarization call, in tokens.
///
/// Adherence is the backend's responsibility and may be soft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBounds {
    /// Upper bound on summary length.
    pub max_length: usize,
    /// Lower bound on summary length.
    pub min_length: usize,
}

impl LengthBounds {
    /// Creates a new pair of bounds.
    #[must_use]
    pub const fn new(max_length: usize, min_length: usize) -> Self {
        Self {
            max_length,
            min_length,
        }
    }
}

/// Tokenizer and summarizer primitives of a sequence-to-sequence model.
///
/// Implementations must be `Send + Sync`: a single instance is shared
/// read-only by every concurrent summarization, including the parallel map
/// phase. Summaries are always produced deterministically (no sampling), so
/// identical inputs yield identical outputs for a fixed model version.
///
/// # Examples
///
/// ```
/// use summarai::service::{FallbackService, LengthBounds, SummaryService};
///
/// let service = FallbackService::new();
/// let tokens = service.tokenize("Hello there.").unwrap();
/// assert_eq!(service.detokenize(&tokens).unwrap(), "Hello there.");
/// let summary = service.summarize("Hello there.", LengthBounds::new(50, 5)).unwrap();
/// assert_eq!(summary, "Hello there.");
/// ```
pub trait SummaryService: Send + Sync {
    /// Returns a short backend name for logs and status output.
    fn name(&self) -> &'static str;

    /// Returns the model's maximum input window in tokens, if it has one.
    fn max_input_tokens(&self) -> Option<usize> {
        None
    }

    /// Encodes text into an ordered sequence of token ids.
    ///
    /// # Errors
    ///
    /// Returns a service error if the text cannot be encoded.
    fn tokenize(&self, text: &str) -> Result<Vec<TokenId>>;

    /// Decodes token ids back into text.
    ///
    /// The round trip need not be byte-exact at arbitrary cut points
    /// (sub-word splits).
    ///
    /// # Errors
    ///
    /// Returns a service error if decoding fails.
    fn detokenize(&self, tokens: &[TokenId]) -> Result<String>;

    /// Summarizes text within the given length bounds.
    ///
    /// # Errors
    ///
    /// Returns a service error if the model fails or the input exceeds its
    /// hard limit.
    fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String>;
}

/// Creates the default summary service.
///
/// # Errors
///
/// Returns an error if the backend cannot be initialized (never fails for
/// the fallback).
pub fn create_service() -> Result<Box<dyn SummaryService>> {
    Ok(Box::new(FallbackService::new()))
}
