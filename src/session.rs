//! Sign-in session boundary
//!
//! Identity lives with an external auth provider. The game only keeps the
//! current user (for the welcome banner and for keying score records) and
//! never lets an auth failure touch gameplay state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Sign-in was cancelled")]
    Cancelled,
    #[error("The auth provider rejected the request: {0}")]
    Rejected(String),
    #[error("The auth provider is unavailable")]
    Unavailable,
}

/// A signed-in user as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub display_name: Option<String>,
}

/// External identity provider
pub trait AuthProvider {
    fn sign_in(&mut self) -> Result<User, AuthError>;
    fn sign_out(&mut self) -> Result<(), AuthError>;
}

/// Provider for offline/headless play: always signs in the same local user
#[derive(Debug, Clone)]
pub struct LocalAuth {
    user: User,
}

impl LocalAuth {
    pub fn new(display_name: impl Into<String>) -> Self {
        let name = display_name.into();
        Self {
            user: User {
                uid: format!("local-{}", name.to_lowercase()),
                display_name: Some(name),
            },
        }
    }
}

impl AuthProvider for LocalAuth {
    fn sign_in(&mut self) -> Result<User, AuthError> {
        Ok(self.user.clone())
    }

    fn sign_out(&mut self) -> Result<(), AuthError> {
        Ok(())
    }
}

/// Current sign-in state
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Provider notification: the signed-in user changed
    pub fn on_auth_state_changed(&mut self, user: Option<User>) {
        match &user {
            Some(u) => log::info!(
                "Signed in as {}",
                u.display_name.as_deref().unwrap_or(&u.uid)
            ),
            None => log::info!("Signed out"),
        }
        self.user = user;
    }

    /// Ask the provider to sign in. On failure the session is unchanged.
    pub fn sign_in(&mut self, provider: &mut dyn AuthProvider) -> Result<(), AuthError> {
        match provider.sign_in() {
            Ok(user) => {
                self.on_auth_state_changed(Some(user));
                Ok(())
            }
            Err(e) => {
                log::warn!("Login failed: {}", e);
                Err(e)
            }
        }
    }

    pub fn sign_out(&mut self, provider: &mut dyn AuthProvider) -> Result<(), AuthError> {
        match provider.sign_out() {
            Ok(()) => {
                self.on_auth_state_changed(None);
                Ok(())
            }
            Err(e) => {
                log::warn!("Logout failed: {}", e);
                Err(e)
            }
        }
    }

    /// Banner text; empty when nobody is signed in
    pub fn welcome_text(&self) -> String {
        match &self.user {
            Some(User {
                display_name: Some(name),
                ..
            }) => format!("Welcome, {}!", name),
            Some(_) => "Welcome!".to_string(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingAuth;

    impl AuthProvider for FailingAuth {
        fn sign_in(&mut self) -> Result<User, AuthError> {
            Err(AuthError::Rejected("popup blocked".to_string()))
        }

        fn sign_out(&mut self) -> Result<(), AuthError> {
            Err(AuthError::Unavailable)
        }
    }

    #[test]
    fn test_sign_in_and_out() {
        let mut session = Session::new();
        let mut auth = LocalAuth::new("Ada");
        assert_eq!(session.welcome_text(), "");

        session.sign_in(&mut auth).unwrap();
        assert!(session.is_signed_in());
        assert_eq!(session.welcome_text(), "Welcome, Ada!");
        assert_eq!(session.user().map(|u| u.uid.as_str()), Some("local-ada"));

        session.sign_out(&mut auth).unwrap();
        assert!(!session.is_signed_in());
        assert_eq!(session.welcome_text(), "");
    }

    #[test]
    fn test_failures_leave_session_unchanged() {
        let mut session = Session::new();
        assert!(session.sign_in(&mut FailingAuth).is_err());
        assert!(!session.is_signed_in());

        session.on_auth_state_changed(Some(User {
            uid: "u1".to_string(),
            display_name: None,
        }));
        assert_eq!(session.sign_out(&mut FailingAuth), Err(AuthError::Unavailable));
        assert!(session.is_signed_in());
        assert_eq!(session.welcome_text(), "Welcome!");
    }
}
