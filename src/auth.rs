//! Authentication gate.
//!
//! Identity providers stay external; checkout only needs to know whether a
//! user is present and who they are.

use serde::{Deserialize, Serialize};

/// A logged-in shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Provider-scoped identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// Avatar URL, when the provider supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    /// Identity provider key, e.g. `google`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Read-only view of the current authentication state.
pub trait AuthGate {
    /// The logged-in user, if any.
    fn current_user(&self) -> Option<&User>;

    /// Whether a user is logged in.
    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}

/// In-process session holding at most one logged-in user.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// Creates a logged-out session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs a user in, replacing any previous one.
    pub fn login(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Logs out, returning the user that was logged in.
    pub fn logout(&mut self) -> Option<User> {
        self.user.take()
    }
}

impl AuthGate for Session {
    fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shopper() -> User {
        User {
            id: "google-123".to_string(),
            name: "Ana María".to_string(),
            email: "ana@gmail.com".to_string(),
            photo: None,
            provider: Some("google".to_string()),
        }
    }

    #[test]
    fn fresh_sessions_are_logged_out() {
        let session = Session::new();

        assert!(!session.is_authenticated());
        assert!(session.current_user().is_none());
    }

    #[test]
    fn login_then_logout_round_trips_the_user() {
        let mut session = Session::new();

        session.login(shopper());
        assert!(session.is_authenticated());
        assert_eq!(
            session.current_user().map(|u| u.email.as_str()),
            Some("ana@gmail.com")
        );

        let user = session.logout();
        assert_eq!(user.map(|u| u.id), Some("google-123".to_string()));
        assert!(!session.is_authenticated());
    }
}
