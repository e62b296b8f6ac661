//! Summarizer configuration.

use crate::Result;
use crate::chunking::{DEFAULT_CHUNK_TOKENS, DEFAULT_MAX_CHUNKS};
use crate::error::{ChunkingError, Error};
use crate::service::LengthBounds;
use serde::{Deserialize, Serialize};

/// Length bounds for the direct path.
pub const DEFAULT_DIRECT_BOUNDS: LengthBounds = LengthBounds::new(180, 30);

/// Length bounds for each chunk in the map phase.
pub const DEFAULT_CHUNK_BOUNDS: LengthBounds = LengthBounds::new(140, 25);

/// Length bounds for the reduction.
pub const DEFAULT_FINAL_BOUNDS: LengthBounds = LengthBounds::new(200, 40);

/// Options of the chunked summarizer.
///
/// Field names match the keys of the `[summarizer]` table in the TOML
/// config file; every key is optional.
///
/// # Examples
///
/// ```
/// use summarai::summarizer::SummarizerConfig;
///
/// let config: SummarizerConfig = toml::from_str("max_chunks = 8").unwrap();
/// assert_eq!(config.max_chunks, 8);
/// assert_eq!(config.chunk_tokens, 800);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Maximum tokens per chunk.
    pub chunk_tokens: usize,
    /// Maximum chunks summarized; the rest of the input is dropped.
    pub max_chunks: usize,
    /// Maximum summary length on the direct path.
    pub direct_max_length: usize,
    /// Minimum summary length on the direct path.
    pub direct_min_length: usize,
    /// Maximum summary length per chunk.
    pub chunk_max_length: usize,
    /// Minimum summary length per chunk.
    pub chunk_min_length: usize,
    /// Maximum length of the reduced summary.
    pub final_max_length: usize,
    /// Minimum length of the reduced summary.
    pub final_min_length: usize,
    /// Summarize chunks on the rayon thread pool.
    pub parallel_map: bool,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            chunk_tokens: DEFAULT_CHUNK_TOKENS,
            max_chunks: DEFAULT_MAX_CHUNKS,
            direct_max_length: DEFAULT_DIRECT_BOUNDS.max_length,
            direct_min_length: DEFAULT_DIRECT_BOUNDS.min_length,
            chunk_max_length: DEFAULT_CHUNK_BOUNDS.max_length,
            chunk_min_length: DEFAULT_CHUNK_BOUNDS.min_length,
            final_max_length: DEFAULT_FINAL_BOUNDS.max_length,
            final_min_length: DEFAULT_FINAL_BOUNDS.min_length,
            parallel_map: false,
        }
    }
}

impl SummarizerConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chunk size in tokens.
    #[must_use]
    pub const fn chunk_tokens(mut self, chunk_tokens: usize) -> Self {
        self.chunk_tokens = chunk_tokens;
        self
    }

    /// Sets the chunk cap.
    #[must_use]
    pub const fn max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    /// Sets whether the map phase runs in parallel.
    #[must_use]
    pub const fn parallel_map(mut self, enabled: bool) -> Self {
        self.parallel_map = enabled;
        self
    }

    /// Sets the direct-path bounds.
    #[must_use]
    pub const fn direct_bounds(mut self, bounds: LengthBounds) -> Self {
        self.direct_max_length = bounds.max_length;
        self.direct_min_length = bounds.min_length;
        self
    }

    /// Sets the per-chunk bounds.
    #[must_use]
    pub const fn chunk_bounds(mut self, bounds: LengthBounds) -> Self {
        self.chunk_max_length = bounds.max_length;
        self.chunk_min_length = bounds.min_length;
        self
    }

    /// Sets the reduction bounds.
    #[must_use]
    pub const fn final_bounds(mut self, bounds: LengthBounds) -> Self {
        self.final_max_length = bounds.max_length;
        self.final_min_length = bounds.min_length;
        self
    }

    /// Bounds used on the direct path.
    #[must_use]
    pub const fn direct(&self) -> LengthBounds {
        LengthBounds::new(self.direct_max_length, self.direct_min_length)
    }

    /// Bounds used per chunk.
    #[must_use]
    pub const fn chunk(&self) -> LengthBounds {
        LengthBounds::new(self.chunk_max_length, self.chunk_min_length)
    }

    /// Bounds used for the reduction.
    #[must_use]
    pub const fn reduce(&self) -> LengthBounds {
        LengthBounds::new(self.final_max_length, self.final_min_length)
    }

    /// Largest reduction input the map phase can produce, in tokens.
    ///
    /// Every chunk summary may reach `chunk_max_length`, and the summaries
    /// are joined with one space each.
    #[must_use]
    pub const fn max_reduce_input_tokens(&self) -> usize {
        self.max_chunks
            .saturating_mul(self.chunk_max_length)
            .saturating_add(self.max_chunks.saturating_sub(1))
    }

    /// Checks the configuration against itself and the model window.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkingError::InvalidConfig`] if a size is zero,
    /// [`ChunkingError::ChunkTooLarge`] if `chunk_tokens` exceeds
    /// `max_input_tokens`, [`ChunkingError::ReduceInputTooLarge`] if the
    /// joined chunk summaries could exceed it, and [`Error::Config`] if a
    /// length bound is zero or inverted.
    pub fn validate(&self, max_input_tokens: Option<usize>) -> Result<()> {
        if self.chunk_tokens == 0 {
            return Err(ChunkingError::InvalidConfig {
                reason: "chunk_tokens must be > 0".to_string(),
            }
            .into());
        }
        if self.max_chunks == 0 {
            return Err(ChunkingError::InvalidConfig {
                reason: "max_chunks must be > 0".to_string(),
            }
            .into());
        }
        if let Some(max) = max_input_tokens
            && self.chunk_tokens > max
        {
            return Err(ChunkingError::ChunkTooLarge {
                size: self.chunk_tokens,
                max,
            }
            .into());
        }

        for (name, bounds) in [
            ("direct", self.direct()),
            ("chunk", self.chunk()),
            ("final", self.reduce()),
        ] {
            if bounds.max_length == 0 {
                return Err(Error::config(format!("{name}_max_length must be > 0")));
            }
            if bounds.min_length > bounds.max_length {
                return Err(Error::config(format!(
                    "{name}_min_length ({}) exceeds {name}_max_length ({})",
                    bounds.min_length, bounds.max_length
                )));
            }
        }

        if let Some(max) = max_input_tokens {
            let size = self.max_reduce_input_tokens();
            if size > max {
                return Err(ChunkingError::ReduceInputTooLarge {
                    max_chunks: self.max_chunks,
                    chunk_max_length: self.chunk_max_length,
                    size,
                    max,
                }
                .into());
            }
        }

        Ok(())
    }
}
