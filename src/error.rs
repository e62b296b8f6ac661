//! Error types for SummarAI operations.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! summarization core, the summary service boundary, accounts, storage,
//! I/O, and CLI commands.

use thiserror::Error;

/// Result type alias for SummarAI operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
///
/// Every failure carries a stable kind tag (see [`Error::kind`]) so callers
/// can branch on the category without matching on messages.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller input rejected before reaching the summarizer.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Failure raised by the tokenizer or summarization backend.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    /// Chunk planning errors.
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkingError),

    /// Account and session errors.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Storage-related errors (database operations).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

impl Error {
    /// Creates a configuration error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns a stable tag naming the error category.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Input(_) => "input",
            Self::Service(_) => "service",
            Self::Chunking(_) => "chunking",
            Self::Auth(_) => "auth",
            Self::Storage(_) => "storage",
            Self::Io(_) => "io",
            Self::Command(_) => "command",
            Self::Config { .. } => "config",
        }
    }
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum InputError {
    /// Text to summarize is empty after trimming.
    #[error("please enter valid text")]
    EmptyText,

    /// A required field was empty.
    #[error("all fields are required: missing {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// Email address is not well formed.
    #[error("invalid email address: {email}")]
    InvalidEmail {
        /// The rejected address.
        email: String,
    },
}

/// Errors raised by a [`crate::service::SummaryService`] backend.
///
/// The summarizer never inspects or rewraps these.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Text could not be encoded.
    #[error("tokenization failed: {0}")]
    Tokenize(String),

    /// Token ids could not be decoded.
    #[error("detokenization failed: {0}")]
    Detokenize(String),

    /// The model failed to produce a summary.
    #[error("summarization failed: {0}")]
    Summarize(String),

    /// Input exceeds the model's hard input window.
    #[error("input of {tokens} tokens exceeds model limit of {max}")]
    InputTooLong {
        /// Token count of the rejected input.
        tokens: usize,
        /// Model limit.
        max: usize,
    },

    /// Backend cannot be reached or was not loaded.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// Chunking-specific errors.
#[derive(Error, Debug)]
pub enum ChunkingError {
    /// Invalid chunk configuration.
    #[error("invalid chunk configuration: {reason}")]
    InvalidConfig {
        /// Reason the configuration is invalid.
        reason: String,
    },

    /// Chunk window exceeds the model input window.
    #[error("chunk size {size} exceeds model input window {max}")]
    ChunkTooLarge {
        /// Configured chunk size in tokens.
        size: usize,
        /// Model input window in tokens.
        max: usize,
    },

    /// Joined chunk summaries may exceed the model input window.
    #[error(
        "{max_chunks} chunk summaries of up to {chunk_max_length} tokens need {size} tokens, \
         over the model input window {max}; lower max_chunks or chunk_max_length"
    )]
    ReduceInputTooLarge {
        /// Configured chunk cap.
        max_chunks: usize,
        /// Configured per-chunk summary length.
        chunk_max_length: usize,
        /// Worst-case reduction input in tokens.
        size: usize,
        /// Model input window in tokens.
        max: usize,
    },
}

/// Account and session errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No user is logged in.
    #[error("please sign up or log in first")]
    NotLoggedIn,

    /// Email is already registered.
    #[error("email already registered: {email}")]
    EmailTaken {
        /// The duplicate email.
        email: String,
    },

    /// Username is already taken.
    #[error("username already taken: {username}")]
    UsernameTaken {
        /// The duplicate username.
        username: String,
    },

    /// Email/password pair did not match.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Password hashing or hash parsing failed.
    #[error("password hash error: {0}")]
    Hash(String),
}

/// Storage-specific errors for database operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection or query error.
    #[error("database error: {0}")]
    Database(String),

    /// Storage not initialized (init command not run).
    #[error("SummarAI not initialized. Run: summarai init")]
    NotInitialized,

    /// User not found by ID.
    #[error("user not found: {id}")]
    UserNotFound {
        /// User ID that was not found.
        id: i64,
    },

    /// Schema migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Memory mapping error.
    #[error("memory mapping failed: {path}: {reason}")]
    MmapFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Database(err.to_string()))
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::Hash(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("bad config");
        assert_eq!(err.to_string(), "configuration error: bad config");
    }

    #[test]
    fn test_input_error_display() {
        assert_eq!(InputError::EmptyText.to_string(), "please enter valid text");

        let err = InputError::MissingField { field: "email" };
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_service_error_display() {
        let err = ServiceError::InputTooLong {
            tokens: 2000,
            max: 1024,
        };
        assert_eq!(
            err.to_string(),
            "input of 2000 tokens exceeds model limit of 1024"
        );

        let err = ServiceError::Unavailable("model not loaded".to_string());
        assert!(err.to_string().contains("model not loaded"));
    }

    #[test]
    fn test_auth_error_display() {
        assert_eq!(
            AuthError::NotLoggedIn.to_string(),
            "please sign up or log in first"
        );
        let err = AuthError::EmailTaken {
            email: "a@b.io".to_string(),
        };
        assert!(err.to_string().contains("a@b.io"));
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::NotInitialized;
        assert_eq!(err.to_string(), "SummarAI not initialized. Run: summarai init");

        let err = StorageError::UserNotFound { id: 42 };
        assert_eq!(err.to_string(), "user not found: 42");
    }

    #[test]
    fn test_error_kind() {
        let err: Error = ServiceError::Summarize("oom".to_string()).into();
        assert_eq!(err.kind(), "service");

        let err: Error = InputError::EmptyText.into();
        assert_eq!(err.kind(), "input");

        let err: Error = AuthError::InvalidCredentials.into();
        assert_eq!(err.kind(), "auth");

        assert_eq!(Error::config("x").kind(), "config");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_rusqlite_error_to_error() {
        let rusqlite_err = rusqlite::Error::InvalidQuery;
        let err: Error = rusqlite_err.into();
        assert!(matches!(err, Error::Storage(StorageError::Database(_))));
    }

    #[test]
    fn test_from_serde_json_error_to_storage_error() {
        let json_err: serde_json::Error = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err: StorageError = json_err.into();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_err = toml::from_str::<toml::Table>("= broken").unwrap_err();
        let err: Error = toml_err.into();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_chunking_error_variants() {
        let err = ChunkingError::ChunkTooLarge {
            size: 2048,
            max: 1024,
        };
        assert!(err.to_string().contains("2048"));
        assert!(err.to_string().contains("1024"));

        let err = ChunkingError::InvalidConfig {
            reason: "chunk_tokens must be > 0".to_string(),
        };
        assert!(err.to_string().contains("chunk_tokens"));
    }
}
