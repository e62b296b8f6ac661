//! Storage trait definition.
//!
//! Defines the interface for persistent storage backends holding user
//! credentials and the login session.

use crate::core::{Session, User};
use crate::error::Result;
use serde::Serialize;

/// Trait for persistent storage backends.
pub trait Storage: Send {
    /// Initializes storage (creates schema, runs migrations).
    ///
    /// Should be idempotent - safe to call multiple times.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation or migration fails.
    fn init(&mut self) -> Result<()>;

    /// Checks if storage is initialized.
    ///
    /// # Errors
    ///
    /// Returns an error if the check cannot be performed.
    fn is_initialized(&self) -> Result<bool>;

    /// Deletes all users and the session, keeping the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    fn reset(&mut self) -> Result<()>;

    // ==================== Session Operations ====================

    /// Creates or replaces the session.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or database write fails.
    fn save_session(&mut self, session: &Session) -> Result<()>;

    /// Loads the session, or `None` if none was saved.
    ///
    /// # Errors
    ///
    /// Returns an error if database read or deserialization fails.
    fn load_session(&self) -> Result<Option<Session>>;

    // ==================== User Operations ====================

    /// Inserts a user and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including uniqueness
    /// violations on username or email.
    fn add_user(&mut self, user: &User) -> Result<i64>;

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_user(&self, id: i64) -> Result<Option<User>>;

    /// Retrieves a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Retrieves a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Lists all users ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_users(&self) -> Result<Vec<User>>;

    /// Returns storage statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the statistics cannot be gathered.
    fn stats(&self) -> Result<StorageStats>;
}

/// Storage statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StorageStats {
    /// Number of registered users.
    pub user_count: usize,
    /// Username of the logged-in user.
    pub logged_in_as: Option<String>,
    /// Schema version.
    pub schema_version: u32,
    /// Database file size in bytes.
    pub db_size: Option<u64>,
}
