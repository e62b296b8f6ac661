//! # SummarAI
//!
//! Summarize text of any length with a model that only accepts a bounded
//! input window.
//!
//! Short input is summarized in one call. Longer input is cut into
//! fixed-size token windows, each window is summarized, and the partial
//! summaries are summarized once more into the final result.
//!
//! ## Features
//!
//! - **Map/Reduce Summarizer**: [`ChunkedSummarizer`] over any [`SummaryService`]
//! - **Token Windows**: capped, non-overlapping chunking with truncation reporting
//! - **Accounts**: Argon2-hashed sign-up/log-in gating the CLI
//! - **`SQLite` Storage**: users and the login session, with schema migrations
//! - **Memory Mapping**: large input files are mapped rather than buffered

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
// Note: unsafe is needed for memory-mapped I/O (memmap2)
#![warn(unsafe_code)]

pub mod auth;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod logging;
pub mod service;
pub mod storage;
pub mod summarizer;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use core::{Chunk, Session, SessionUser, Summary, SummaryPath, Truncation, User};

// Re-export storage types
pub use storage::{DEFAULT_DB_PATH, SqliteStorage, Storage};

// Re-export chunking types
pub use chunking::{ChunkPlan, FixedWindowChunker};

// Re-export service types
pub use service::{FallbackService, LengthBounds, SummaryService, TokenId, create_service};

// Re-export summarizer types
pub use summarizer::{ChunkedSummarizer, SummarizerConfig};

// Re-export account and config types
pub use auth::Accounts;
pub use config::Config;

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
