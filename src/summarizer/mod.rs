//! Chunked map-reduce summarization.
//!
//! [`ChunkedSummarizer`] turns text of any length into one bounded summary:
//!
//! - **Direct**: input that fits in one window is summarized once and the
//!   model output is returned as is.
//! - **Map/Reduce**: longer input is cut into token windows (at most
//!   `max_chunks`), each window is summarized on its own, the partial
//!   summaries are joined with single spaces in window order, and the
//!   joined text is summarized once more. The result is trimmed.
//!
//! The path is chosen once from the token count. Service errors are
//! returned unchanged and nothing is retried.

pub mod config;

pub use config::SummarizerConfig;

use crate::Result;
use crate::chunking::FixedWindowChunker;
use crate::core::{Chunk, Summary};
use crate::service::SummaryService;
use rayon::prelude::*;
use tracing::{debug, trace, warn};

/// Map-reduce summarizer over a shared [`SummaryService`].
///
/// Holds no mutable state; one instance may serve concurrent callers.
///
/// # Examples
///
/// ```
/// use summarai::service::FallbackService;
/// use summarai::summarizer::{ChunkedSummarizer, SummarizerConfig};
///
/// let service = FallbackService::new();
/// let summarizer = ChunkedSummarizer::new(&service, SummarizerConfig::default()).unwrap();
/// let summary = summarizer.summarize("Rust is fast. Rust is safe.").unwrap();
/// assert_eq!(summary.text, "Rust is fast. Rust is safe.");
/// ```
pub struct ChunkedSummarizer<'a, S: SummaryService + ?Sized> {
    service: &'a S,
    config: SummarizerConfig,
    chunker: FixedWindowChunker,
}

impl<'a, S: SummaryService + ?Sized> ChunkedSummarizer<'a, S> {
    /// Creates a summarizer.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid or its chunk size exceeds the
    /// service's input window.
    pub fn new(service: &'a S, config: SummarizerConfig) -> Result<Self> {
        config.validate(service.max_input_tokens())?;
        let chunker = FixedWindowChunker::new(config.chunk_tokens, config.max_chunks)?;
        Ok(Self {
            service,
            config,
            chunker,
        })
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    /// Summarizes `text`.
    ///
    /// `text` should be non-empty after trimming; this is the caller's
    /// check. The direct path returns the model output untrimmed; the
    /// map-reduce path trims it.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the service's tokenizer or summarizer.
    pub fn summarize(&self, text: &str) -> Result<Summary> {
        let tokens = self.service.tokenize(text)?;
        let token_count = tokens.len();

        if self.chunker.fits(token_count) {
            debug!(
                tokens = token_count,
                service = self.service.name(),
                "summarizing directly"
            );
            let summary = self.service.summarize(text, self.config.direct())?;
            return Ok(Summary::direct(summary, token_count));
        }

        let plan = self.chunker.plan(token_count);
        let truncation = plan.truncation();
        if let Some(t) = &truncation {
            warn!(
                total_tokens = t.total_tokens,
                dropped_tokens = t.dropped_tokens,
                max_chunks = plan.max_chunks,
                "input exceeds chunk cap, tail dropped"
            );
        }
        debug!(
            tokens = token_count,
            chunks = plan.len(),
            parallel = self.config.parallel_map,
            "summarizing in chunks"
        );

        let chunks = FixedWindowChunker::decode(&plan, &tokens, self.service)?;
        let partials = self.map_chunks(&chunks)?;
        let combined = partials.join(" ");

        debug!(chars = combined.len(), "reducing partial summaries");
        let reduced = self.service.summarize(&combined, self.config.reduce())?;

        Ok(Summary::map_reduce(
            reduced.trim().to_string(),
            token_count,
            chunks.len(),
            truncation,
        ))
    }

    /// Summarizes `text` and returns only the summary text.
    ///
    /// # Errors
    ///
    /// See [`Self::summarize`].
    pub fn summarize_text(&self, text: &str) -> Result<String> {
        self.summarize(text).map(|summary| summary.text)
    }

    /// Summarizes each chunk, keeping chunk order in the output.
    fn map_chunks(&self, chunks: &[Chunk]) -> Result<Vec<String>> {
        let bounds = self.config.chunk();
        let summarize_one = |chunk: &Chunk| {
            trace!(
                index = chunk.index,
                start = chunk.start(),
                end = chunk.end(),
                "summarizing chunk"
            );
            self.service.summarize(&chunk.text, bounds)
        };

        if self.config.parallel_map {
            chunks.par_iter().map(summarize_one).collect()
        } else {
            chunks.iter().map(summarize_one).collect()
        }
    }
}
