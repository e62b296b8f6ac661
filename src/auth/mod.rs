//! Accounts and login session.
//!
//! Gates access to the summarizer: a user must sign up or log in first.
//! Passwords are stored as Argon2 hashes; the session is a single row in
//! storage that remembers who is logged in.

pub mod password;

pub use password::{hash_password, verify_password};

use crate::Result;
use crate::core::{Session, SessionUser, User};
use crate::error::{AuthError, InputError, StorageError};
use crate::storage::Storage;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Literal pattern, always compiles
    #[allow(clippy::expect_used)]
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex")
});

/// Returns true if `email` looks like `local@domain.tld`.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Account operations over a storage backend.
///
/// # Examples
///
/// ```
/// use summarai::auth::Accounts;
/// use summarai::storage::{SqliteStorage, Storage};
///
/// let mut storage = SqliteStorage::in_memory().unwrap();
/// storage.init().unwrap();
/// let mut accounts = Accounts::new(&mut storage);
/// accounts.signup("ada", "ada@example.com", "s3cret").unwrap();
/// assert_eq!(accounts.require_user().unwrap().username, "ada");
/// ```
pub struct Accounts<'a, S: Storage> {
    storage: &'a mut S,
}

impl<'a, S: Storage> Accounts<'a, S> {
    /// Wraps a storage backend.
    pub const fn new(storage: &'a mut S) -> Self {
        Self { storage }
    }

    /// Registers a user and logs them in.
    ///
    /// Username and email are trimmed; the password is used as given.
    ///
    /// # Errors
    ///
    /// Returns an input error for missing fields or a malformed email, and
    /// an auth error if the email or username is already registered.
    pub fn signup(&mut self, username: &str, email: &str, password: &str) -> Result<User> {
        let username = username.trim();
        let email = email.trim();

        for (field, value) in [("username", username), ("email", email), ("password", password)] {
            if value.is_empty() {
                return Err(InputError::MissingField { field }.into());
            }
        }
        if !is_valid_email(email) {
            return Err(InputError::InvalidEmail {
                email: email.to_string(),
            }
            .into());
        }

        if self.storage.get_user_by_email(email)?.is_some() {
            return Err(AuthError::EmailTaken {
                email: email.to_string(),
            }
            .into());
        }
        if self.storage.get_user_by_username(username)?.is_some() {
            return Err(AuthError::UsernameTaken {
                username: username.to_string(),
            }
            .into());
        }

        let password_hash = hash_password(password)?;
        let user = User::new(username.to_string(), email.to_string(), password_hash);
        let id = self.storage.add_user(&user)?;
        let user = self
            .storage
            .get_user(id)?
            .ok_or(StorageError::UserNotFound { id })?;

        self.start_session(&user)?;
        tracing::info!(user_id = id, username, "user signed up");
        Ok(user)
    }

    /// Logs in by email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if the email is unknown or
    /// the password does not match.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let email = email.trim();
        let Some(user) = self.storage.get_user_by_email(email)? else {
            tracing::debug!(email, "login for unknown email");
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(email, "login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        self.start_session(&user)?;
        tracing::info!(user_id = user.id, username = %user.username, "user logged in");
        Ok(user)
    }

    /// Logs out the current user.
    ///
    /// Returns the user that was logged in, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    pub fn logout(&mut self) -> Result<Option<SessionUser>> {
        let Some(mut session) = self.storage.load_session()? else {
            return Ok(None);
        };
        let user = session.log_out();
        self.storage.save_session(&session)?;
        Ok(user)
    }

    /// Returns the logged-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub fn current_user(&self) -> Result<Option<SessionUser>> {
        Ok(self.storage.load_session()?.and_then(|session| session.user))
    }

    /// Returns the logged-in user or fails.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotLoggedIn`] if nobody is logged in.
    pub fn require_user(&self) -> Result<SessionUser> {
        self.current_user()?.ok_or_else(|| AuthError::NotLoggedIn.into())
    }

    fn start_session(&mut self, user: &User) -> Result<()> {
        let session_user = user.session_user().ok_or_else(|| {
            StorageError::Database("user has no id after insert".to_string())
        })?;
        let mut session = self.storage.load_session()?.unwrap_or_default();
        session.log_in(session_user);
        self.storage.save_session(&session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::storage::SqliteStorage;

    fn setup() -> SqliteStorage {
        let mut storage = SqliteStorage::in_memory().unwrap();
        storage.init().unwrap();
        storage
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("ada@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example@x.io"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_signup_logs_in() {
        let mut storage = setup();
        let mut accounts = Accounts::new(&mut storage);
        let user = accounts.signup("  ada ", " ada@example.com ", "pw").unwrap();
        assert_eq!(user.username, "ada");
        assert_eq!(user.email, "ada@example.com");
        assert_ne!(user.password_hash, "pw");

        let current = accounts.current_user().unwrap().unwrap();
        assert_eq!(Some(current.id), user.id);
    }

    #[test]
    fn test_signup_missing_fields() {
        let mut storage = setup();
        let mut accounts = Accounts::new(&mut storage);
        let err = accounts.signup("  ", "ada@example.com", "pw").unwrap_err();
        assert!(matches!(
            err,
            Error::Input(InputError::MissingField { field: "username" })
        ));
        let err = accounts.signup("ada", "ada@example.com", "").unwrap_err();
        assert!(matches!(
            err,
            Error::Input(InputError::MissingField { field: "password" })
        ));
    }

    #[test]
    fn test_signup_invalid_email() {
        let mut storage = setup();
        let mut accounts = Accounts::new(&mut storage);
        let err = accounts.signup("ada", "not-an-email", "pw").unwrap_err();
        assert!(matches!(err, Error::Input(InputError::InvalidEmail { .. })));
    }

    #[test]
    fn test_signup_duplicates() {
        let mut storage = setup();
        let mut accounts = Accounts::new(&mut storage);
        accounts.signup("ada", "ada@example.com", "pw").unwrap();

        let err = accounts.signup("ada2", "ada@example.com", "pw").unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::EmailTaken { .. })));

        let err = accounts.signup("ada", "other@example.com", "pw").unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::UsernameTaken { .. })));
    }

    #[test]
    fn test_login_and_logout() {
        let mut storage = setup();
        let mut accounts = Accounts::new(&mut storage);
        accounts.signup("ada", "ada@example.com", "pw").unwrap();
        assert_eq!(accounts.logout().unwrap().unwrap().username, "ada");
        assert!(accounts.current_user().unwrap().is_none());
        assert!(matches!(
            accounts.require_user().unwrap_err(),
            Error::Auth(AuthError::NotLoggedIn)
        ));

        let user = accounts.login("ada@example.com", "pw").unwrap();
        assert_eq!(user.username, "ada");
        assert!(accounts.require_user().is_ok());
    }

    #[test]
    fn test_login_wrong_password() {
        let mut storage = setup();
        let mut accounts = Accounts::new(&mut storage);
        accounts.signup("ada", "ada@example.com", "pw").unwrap();
        accounts.logout().unwrap();

        let err = accounts.login("ada@example.com", "nope").unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::InvalidCredentials)));
        let err = accounts.login("ghost@example.com", "pw").unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::InvalidCredentials)));
        assert!(accounts.current_user().unwrap().is_none());
    }

    #[test]
    fn test_logout_without_session() {
        let mut storage = setup();
        let mut accounts = Accounts::new(&mut storage);
        assert!(accounts.logout().unwrap().is_none());
    }

    #[test]
    fn test_session_default_on_first_login() {
        let mut storage = setup();
        Accounts::new(&mut storage).signup("ada", "ada@example.com", "pw").unwrap();
        let session: Session = storage.load_session().unwrap().unwrap();
        assert!(session.is_logged_in());
    }
}
