//! Token chunking for the map phase.
//!
//! Inputs longer than one model window are cut into fixed, non-overlapping
//! token windows. The number of windows is capped; the tail beyond the cap
//! is dropped and reported through [`ChunkPlan::truncation`].

pub mod fixed;

pub use fixed::{ChunkPlan, FixedWindowChunker};

/// Default window size in tokens. Must stay below the model input window.
pub const DEFAULT_CHUNK_TOKENS: usize = 800;

/// Default cap on windows per input.
pub const DEFAULT_MAX_CHUNKS: usize = 5;
