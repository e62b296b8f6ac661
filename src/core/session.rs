//! Login session state.
//!
//! There is one session per database: the user who last signed up or
//! logged in, until they log out.

use serde::{Deserialize, Serialize};

/// Identity of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// User ID.
    pub id: i64,
    /// Username shown in greetings.
    pub username: String,
}

/// Persistent session.
///
/// # Examples
///
/// ```
/// use summarai::core::{Session, SessionUser};
///
/// let mut session = Session::new();
/// session.log_in(SessionUser { id: 1, username: "ada".to_string() });
/// assert!(session.is_logged_in());
/// assert!(session.log_out().is_some());
/// assert!(!session.is_logged_in());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Logged-in user, if any.
    pub user: Option<SessionUser>,

    /// Session metadata.
    pub metadata: SessionMetadata,
}

/// Metadata associated with a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Unix timestamp when the session was created.
    pub created_at: i64,

    /// Unix timestamp when the session last changed.
    pub updated_at: i64,
}

impl Session {
    /// Creates a new empty session with current timestamp.
    #[must_use]
    pub fn new() -> Self {
        let now = current_timestamp();
        Self {
            user: None,
            metadata: SessionMetadata {
                created_at: now,
                updated_at: now,
            },
        }
    }

    /// Records `user` as logged in, replacing any previous user.
    pub fn log_in(&mut self, user: SessionUser) {
        self.user = Some(user);
        self.touch();
    }

    /// Clears the logged-in user.
    ///
    /// Returns the user that was logged in.
    pub fn log_out(&mut self) -> Option<SessionUser> {
        let user = self.user.take();
        if user.is_some() {
            self.touch();
        }
        user
    }

    /// Returns true if a user is logged in.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    fn touch(&mut self) {
        self.metadata.updated_at = current_timestamp();
    }
}

#[allow(clippy::cast_possible_wrap)]
fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> SessionUser {
        SessionUser {
            id: 7,
            username: "ada".to_string(),
        }
    }

    #[test]
    fn test_session_new() {
        let session = Session::new();
        assert!(!session.is_logged_in());
        assert!(session.metadata.created_at > 0);
        assert_eq!(session.metadata.created_at, session.metadata.updated_at);
    }

    #[test]
    fn test_log_in_replaces_user() {
        let mut session = Session::new();
        session.log_in(ada());
        session.log_in(SessionUser {
            id: 8,
            username: "grace".to_string(),
        });
        assert_eq!(session.user.as_ref().map(|u| u.id), Some(8));
    }

    #[test]
    fn test_log_out_when_anonymous() {
        let mut session = Session::new();
        assert!(session.log_out().is_none());
    }

    #[test]
    fn test_session_serialization() {
        let mut session = Session::new();
        session.log_in(ada());
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(session, back);
    }
}
