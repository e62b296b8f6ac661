//! `SQLite` storage implementation.
//!
//! Persists users and the login session with migration support.

// SQLite stores all integers as i64. Counts are non-negative and fit in usize.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use crate::core::{Session, User};
use crate::error::{Result, StorageError};
use crate::storage::schema::{
    CHECK_SCHEMA_SQL, CURRENT_SCHEMA_VERSION, GET_VERSION_SQL, SCHEMA_SQL, SET_VERSION_SQL,
};
use crate::storage::traits::{Storage, StorageStats};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::{Path, PathBuf};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";

/// SQLite-based storage implementation.
///
/// # Examples
///
/// ```no_run
/// use summarai::storage::{SqliteStorage, Storage};
///
/// let mut storage = SqliteStorage::open("summarai.db").unwrap();
/// storage.init().unwrap();
/// ```
pub struct SqliteStorage {
    /// `SQLite` connection.
    conn: Connection,
    /// Path to the database file (None for in-memory).
    path: Option<PathBuf>,
}

impl SqliteStorage {
    /// Opens or creates a `SQLite` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Database(e.to_string()))?;
        }

        let conn = Connection::open(&path).map_err(StorageError::from)?;

        conn.execute("PRAGMA foreign_keys = ON;", [])
            .map_err(StorageError::from)?;

        // journal_mode returns a row, so it needs query_row
        let _: String = conn
            .query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))
            .map_err(StorageError::from)?;

        tracing::debug!(path = %path.display(), "opened database");

        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    /// Creates an in-memory `SQLite` database.
    ///
    /// Useful for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        conn.execute("PRAGMA foreign_keys = ON;", [])
            .map_err(StorageError::from)?;

        Ok(Self { conn, path: None })
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Gets the current schema version.
    fn get_schema_version(&self) -> Result<Option<u32>> {
        let version: Option<String> = self
            .conn
            .query_row(GET_VERSION_SQL, [], |row| row.get(0))
            .optional()
            .map_err(StorageError::from)?;

        Ok(version.and_then(|v| v.parse().ok()))
    }

    /// Sets the schema version.
    fn set_schema_version(&self, version: u32) -> Result<()> {
        self.conn
            .execute(SET_VERSION_SQL, params![version.to_string()])
            .map_err(StorageError::from)?;
        Ok(())
    }

    /// Returns current Unix timestamp.
    #[allow(clippy::cast_possible_wrap)]
    fn now() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: Some(row.get(0)?),
            username: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn find_user(&self, column: &str, value: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?");
        let user = self
            .conn
            .query_row(&sql, params![value], Self::row_to_user)
            .optional()
            .map_err(StorageError::from)?;
        Ok(user)
    }
}

impl Storage for SqliteStorage {
    fn init(&mut self) -> Result<()> {
        let is_init: i64 = self
            .conn
            .query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))
            .map_err(StorageError::from)?;

        if is_init == 0 {
            self.conn
                .execute_batch(SCHEMA_SQL)
                .map_err(StorageError::from)?;
            self.set_schema_version(CURRENT_SCHEMA_VERSION)?;
        } else if let Some(current) = self.get_schema_version()?
            && current < CURRENT_SCHEMA_VERSION
        {
            for migration in crate::storage::schema::get_migrations_from(current) {
                self.conn
                    .execute_batch(migration.sql)
                    .map_err(|e| StorageError::Migration(e.to_string()))?;
            }
            self.set_schema_version(CURRENT_SCHEMA_VERSION)?;
            tracing::info!(from = current, to = CURRENT_SCHEMA_VERSION, "migrated schema");
        }

        Ok(())
    }

    fn is_initialized(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))
            .map_err(StorageError::from)?;
        Ok(count > 0)
    }

    fn reset(&mut self) -> Result<()> {
        self.conn
            .execute_batch(
                r"
            DELETE FROM session;
            DELETE FROM users;
        ",
            )
            .map_err(StorageError::from)?;
        Ok(())
    }

    // ==================== Session Operations ====================

    fn save_session(&mut self, session: &Session) -> Result<()> {
        let data = serde_json::to_string(session).map_err(StorageError::from)?;
        let now = Self::now();

        self.conn
            .execute(
                r"
            INSERT OR REPLACE INTO session (id, data, created_at, updated_at)
            VALUES (1, ?, COALESCE((SELECT created_at FROM session WHERE id = 1), ?), ?)
        ",
                params![data, now, now],
            )
            .map_err(StorageError::from)?;

        Ok(())
    }

    fn load_session(&self) -> Result<Option<Session>> {
        let data: Option<String> = self
            .conn
            .query_row("SELECT data FROM session WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()
            .map_err(StorageError::from)?;

        match data {
            Some(json) => {
                let session = serde_json::from_str(&json).map_err(StorageError::from)?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    // ==================== User Operations ====================

    fn add_user(&mut self, user: &User) -> Result<i64> {
        self.conn
            .execute(
                r"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
        ",
                params![user.username, user.email, user.password_hash, Self::now()],
            )
            .map_err(StorageError::from)?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = self
            .conn
            .query_row(&sql, params![id], Self::row_to_user)
            .optional()
            .map_err(StorageError::from)?;
        Ok(user)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_user("email", email)
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.find_user("username", username)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
        let mut stmt = self.conn.prepare(&sql).map_err(StorageError::from)?;

        let users = stmt
            .query_map([], Self::row_to_user)
            .map_err(StorageError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(users)
    }

    fn stats(&self) -> Result<StorageStats> {
        let user_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .map_err(StorageError::from)?;

        let logged_in_as = self
            .load_session()?
            .and_then(|session| session.user)
            .map(|user| user.username);

        let schema_version = self.get_schema_version()?.unwrap_or(0);

        let db_size = self
            .path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok().map(|m| m.len()));

        Ok(StorageStats {
            user_count: user_count as usize,
            logged_in_as,
            schema_version,
            db_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SessionUser;

    fn setup() -> SqliteStorage {
        let mut storage = SqliteStorage::in_memory().unwrap();
        storage.init().unwrap();
        storage
    }

    fn ada() -> User {
        User::new(
            "ada".to_string(),
            "ada@example.com".to_string(),
            "$argon2id$fake".to_string(),
        )
    }

    #[test]
    fn test_init() {
        let mut storage = SqliteStorage::in_memory().unwrap();
        assert!(!storage.is_initialized().unwrap());
        assert!(storage.init().is_ok());
        assert!(storage.is_initialized().unwrap());
    }

    #[test]
    fn test_init_idempotent() {
        let mut storage = SqliteStorage::in_memory().unwrap();
        assert!(storage.init().is_ok());
        assert!(storage.init().is_ok());
    }

    #[test]
    fn test_migration_from_v1() {
        let mut storage = SqliteStorage::in_memory().unwrap();
        storage
            .conn
            .execute_batch(
                r"
            CREATE TABLE schema_info (key TEXT PRIMARY KEY, value TEXT NOT NULL);
            INSERT INTO schema_info (key, value) VALUES ('version', '1');
            CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );
        ",
            )
            .unwrap();

        storage.init().unwrap();
        assert_eq!(storage.get_schema_version().unwrap(), Some(CURRENT_SCHEMA_VERSION));
        assert!(storage.load_session().unwrap().is_none());
    }

    #[test]
    fn test_user_crud() {
        let mut storage = setup();

        let id = storage.add_user(&ada()).unwrap();
        assert!(id > 0);

        let loaded = storage.get_user(id).unwrap().unwrap();
        assert_eq!(loaded.username, "ada");
        assert_eq!(loaded.password_hash, "$argon2id$fake");
        assert!(loaded.created_at > 0);

        assert!(storage.get_user_by_email("ada@example.com").unwrap().is_some());
        assert!(storage.get_user_by_username("ada").unwrap().is_some());
        assert!(storage.get_user_by_email("nobody@example.com").unwrap().is_none());
        assert_eq!(storage.list_users().unwrap().len(), 1);
    }

    #[test]
    fn test_unique_email() {
        let mut storage = setup();
        storage.add_user(&ada()).unwrap();

        let dup = User::new(
            "other".to_string(),
            "ada@example.com".to_string(),
            "h".to_string(),
        );
        assert!(storage.add_user(&dup).is_err());
    }

    #[test]
    fn test_session_crud() {
        let mut storage = setup();
        assert!(storage.load_session().unwrap().is_none());

        let mut session = Session::new();
        session.log_in(SessionUser {
            id: 1,
            username: "ada".to_string(),
        });
        storage.save_session(&session).unwrap();

        let loaded = storage.load_session().unwrap().unwrap();
        assert_eq!(loaded, session);

        session.log_out();
        storage.save_session(&session).unwrap();
        assert!(!storage.load_session().unwrap().unwrap().is_logged_in());
    }

    #[test]
    fn test_reset() {
        let mut storage = setup();
        storage.add_user(&ada()).unwrap();
        storage.save_session(&Session::new()).unwrap();

        storage.reset().unwrap();
        assert!(storage.list_users().unwrap().is_empty());
        assert!(storage.load_session().unwrap().is_none());
        assert!(storage.is_initialized().unwrap());
    }

    #[test]
    fn test_stats() {
        let mut storage = setup();
        let id = storage.add_user(&ada()).unwrap();
        let mut session = Session::new();
        session.log_in(SessionUser {
            id,
            username: "ada".to_string(),
        });
        storage.save_session(&session).unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.user_count, 1);
        assert_eq!(stats.logged_in_as.as_deref(), Some("ada"));
        assert_eq!(stats.schema_version, CURRENT_SCHEMA_VERSION);
        assert!(stats.db_size.is_none());
    }
}
