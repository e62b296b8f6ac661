//! Core domain models for SummarAI.
//!
//! This module contains the fundamental data structures used throughout the
//! crate: chunks, summaries, users, and the login session. These are pure
//! domain models with no I/O dependencies.

pub mod chunk;
pub mod session;
pub mod summary;
pub mod user;

pub use chunk::Chunk;
pub use session::{Session, SessionMetadata, SessionUser};
pub use summary::{Summary, SummaryPath, Truncation};
pub use user::User;
