//! Registered user records.

use crate::core::SessionUser;
use serde::{Deserialize, Serialize};

/// A registered user.
///
/// `password_hash` is an Argon2 PHC string and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (assigned by storage layer).
    pub id: Option<i64>,

    /// Unique display name.
    pub username: String,

    /// Unique login email.
    pub email: String,

    /// Password hash in PHC string format.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Unix timestamp of registration.
    pub created_at: i64,
}

impl User {
    /// Creates an unsaved user.
    #[must_use]
    pub const fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: None,
            username,
            email,
            password_hash,
            created_at: 0,
        }
    }

    /// Returns the session identity for this user, if it has been saved.
    #[must_use]
    pub fn session_user(&self) -> Option<SessionUser> {
        self.id.map(|id| SessionUser {
            id,
            username: self.username.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_user_requires_id() {
        let mut user = User::new("ada".into(), "ada@example.com".into(), "hash".into());
        assert!(user.session_user().is_none());

        user.id = Some(3);
        let session_user = user.session_user().unwrap();
        assert_eq!(session_user.id, 3);
        assert_eq!(session_user.username, "ada");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new("ada".into(), "ada@example.com".into(), "secret-hash".into());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("ada@example.com"));
    }
}
