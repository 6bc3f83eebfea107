//! Credential-check boundary and session context.
//!
//! The surface consumes a [`CredentialProvider`] contract: given a
//! username/password pair it answers authenticated or denied, optionally
//! with a human-readable reason. The default implementation is a fixed
//! configured pair, overridable through the environment so the sandbox
//! can be pointed at different test credentials without a rebuild.

use serde::Serialize;
use tracing::debug;

/// Binary outcome of a credential check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AuthOutcome {
    Authenticated { display_name: String },
    Denied { reason: Option<String> },
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated { .. })
    }
}

/// Credential check contract. Backing implementations may hold a fixed
/// pair or delegate to an external identity provider.
pub trait CredentialProvider: Send + Sync {
    fn authenticate(&self, username: &str, password: &str) -> AuthOutcome;
}

/// Fixed-pair provider. Comparison is exact, case-sensitive string
/// equality on both values.
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Read the configured pair from `QA_SANDBOX_TEST_USERNAME` /
    /// `QA_SANDBOX_TEST_PASSWORD`, defaulting to the sandbox pair.
    pub fn from_env() -> Self {
        let username =
            std::env::var("QA_SANDBOX_TEST_USERNAME").unwrap_or_else(|_| "qa_tester".to_string());
        let password =
            std::env::var("QA_SANDBOX_TEST_PASSWORD").unwrap_or_else(|_| "password123".to_string());
        Self { username, password }
    }

    /// The valid username, shown on the page as a QA hint.
    pub fn hint_username(&self) -> &str {
        &self.username
    }

    /// The valid password, shown on the page as a QA hint.
    pub fn hint_password(&self) -> &str {
        &self.password
    }
}

impl CredentialProvider for StaticCredentials {
    fn authenticate(&self, username: &str, password: &str) -> AuthOutcome {
        if username == self.username && password == self.password {
            AuthOutcome::Authenticated {
                display_name: "QA Tester".to_string(),
            }
        } else {
            // Deliberately generic: the reason never says which value
            // was wrong.
            AuthOutcome::Denied {
                reason: Some("invalid credentials".to_string()),
            }
        }
    }
}

/// Explicit session context: initialised on load, torn down on logout.
/// Passed down rather than kept in module-level mutable state.
#[derive(Debug, Default)]
pub struct Session {
    user: Option<SessionUser>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub display_name: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn establish(&mut self, display_name: &str) {
        debug!(display_name, "session established");
        self.user = Some(SessionUser {
            display_name: display_name.to_string(),
        });
    }

    pub fn logout(&mut self) {
        if self.user.take().is_some() {
            debug!("session torn down");
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_pair_authenticates() {
        let provider = StaticCredentials::new("qa_tester", "password123");
        assert!(provider.authenticate("qa_tester", "password123").is_authenticated());
    }

    #[test]
    fn comparison_is_case_sensitive_and_exact() {
        let provider = StaticCredentials::new("qa_tester", "password123");
        for (user, pass) in [
            ("QA_TESTER", "password123"),
            ("qa_tester", "Password123"),
            ("qa_tester ", "password123"),
            ("", ""),
        ] {
            let outcome = provider.authenticate(user, pass);
            assert!(!outcome.is_authenticated(), "{user:?}/{pass:?}");
        }
    }

    #[test]
    fn denial_reason_is_generic() {
        let provider = StaticCredentials::new("qa_tester", "password123");
        match provider.authenticate("qa_tester", "nope") {
            AuthOutcome::Denied { reason } => {
                let reason = reason.unwrap();
                assert!(!reason.contains("password"));
                assert!(!reason.contains("username"));
            }
            _ => panic!("expected denial"),
        }
    }

    #[test]
    fn session_init_and_teardown() {
        let mut session = Session::new();
        assert!(!session.is_authenticated());

        session.establish("QA Tester");
        assert_eq!(session.user().unwrap().display_name, "QA Tester");

        session.logout();
        assert!(!session.is_authenticated());
        // Logging out twice is harmless.
        session.logout();
    }
}
