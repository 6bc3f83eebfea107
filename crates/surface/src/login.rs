//! Login attempt state machine.
//!
//! idle --submit--> pending --(delay, match)--> success --dismiss--> idle
//! pending --(delay, no match)--> failed --submit--> pending
//!
//! The submit control is disabled while pending, so a submission can never
//! skip the pending state or resolve twice. Field contents are cleared
//! only when the success surface is explicitly dismissed.

use crate::clock::Clock;
use crate::session::{AuthOutcome, CredentialProvider};
use sandbox_common::{Error, Result};
use std::sync::Arc;
use tracing::debug;

/// Fixed simulated network delay for a credential check.
pub const LOGIN_DELAY_MS: u64 = 1500;

/// Tagged state of the current login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    Pending { deadline_ms: u64 },
    Success,
    Failed,
}

impl LoginState {
    fn name(&self) -> &'static str {
        match self {
            LoginState::Idle => "idle",
            LoginState::Pending { .. } => "pending",
            LoginState::Success => "success",
            LoginState::Failed => "failed",
        }
    }
}

pub struct LoginMachine {
    state: LoginState,
    username: String,
    password: String,
    delay_ms: u64,
    provider: Arc<dyn CredentialProvider>,
}

impl LoginMachine {
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self::with_delay(provider, LOGIN_DELAY_MS)
    }

    /// Test mode shortens the delay, never the transitions.
    pub fn with_delay(provider: Arc<dyn CredentialProvider>, delay_ms: u64) -> Self {
        Self {
            state: LoginState::Idle,
            username: String::new(),
            password: String::new(),
            delay_ms,
            provider,
        }
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Inputs are disabled while a check is in flight.
    pub fn inputs_enabled(&self) -> bool {
        !matches!(self.state, LoginState::Pending { .. })
    }

    pub fn set_username(&mut self, value: &str) -> Result<()> {
        self.ensure_editable()?;
        self.username = value.to_string();
        Ok(())
    }

    pub fn set_password(&mut self, value: &str) -> Result<()> {
        self.ensure_editable()?;
        self.password = value.to_string();
        Ok(())
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.inputs_enabled() {
            Ok(())
        } else {
            Err(Error::InvalidStateTransition {
                from: self.state.name().to_string(),
                to: "edit".to_string(),
            })
        }
    }

    /// Submit the current field contents. Rejected while pending.
    pub fn submit(&mut self, clock: &dyn Clock) -> Result<()> {
        match self.state {
            LoginState::Pending { .. } | LoginState::Success => Err(Error::InvalidStateTransition {
                from: self.state.name().to_string(),
                to: "pending".to_string(),
            }),
            LoginState::Idle | LoginState::Failed => {
                let deadline_ms = clock.now_ms() + self.delay_ms;
                debug!(deadline_ms, "login attempt pending");
                self.state = LoginState::Pending { deadline_ms };
                Ok(())
            }
        }
    }

    /// Resolve a due pending attempt. Idempotent for non-pending states.
    pub fn poll(&mut self, clock: &dyn Clock) {
        if let LoginState::Pending { deadline_ms } = self.state {
            if clock.now_ms() >= deadline_ms {
                self.state = match self.provider.authenticate(&self.username, &self.password) {
                    AuthOutcome::Authenticated { .. } => LoginState::Success,
                    AuthOutcome::Denied { .. } => LoginState::Failed,
                };
                debug!(state = self.state.name(), "login attempt resolved");
            }
        }
    }

    /// Dismiss the success surface. The only path that clears the fields.
    pub fn dismiss(&mut self) -> Result<()> {
        if self.state != LoginState::Success {
            return Err(Error::InvalidStateTransition {
                from: self.state.name().to_string(),
                to: "idle".to_string(),
            });
        }
        self.username.clear();
        self.password.clear();
        self.state = LoginState::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::session::StaticCredentials;
    use std::time::Duration;

    fn machine() -> (LoginMachine, ManualClock) {
        let provider = Arc::new(StaticCredentials::new("qa_tester", "password123"));
        (LoginMachine::new(provider), ManualClock::new())
    }

    fn fill_and_submit(m: &mut LoginMachine, clock: &ManualClock, user: &str, pass: &str) {
        m.set_username(user).unwrap();
        m.set_password(pass).unwrap();
        m.submit(clock).unwrap();
    }

    #[test]
    fn valid_pair_reaches_success_through_pending() {
        let (mut m, clock) = machine();
        fill_and_submit(&mut m, &clock, "qa_tester", "password123");
        assert!(matches!(m.state(), LoginState::Pending { .. }));

        // Not due yet: still pending even for a correct pair.
        clock.advance(Duration::from_millis(1499));
        m.poll(&clock);
        assert!(matches!(m.state(), LoginState::Pending { .. }));

        clock.advance(Duration::from_millis(1));
        m.poll(&clock);
        assert_eq!(*m.state(), LoginState::Success);
    }

    #[test]
    fn wrong_pair_fails_and_never_succeeds() {
        let (mut m, clock) = machine();
        fill_and_submit(&mut m, &clock, "wrong_user", "wrong_password");
        clock.advance(Duration::from_millis(2000));
        m.poll(&clock);
        assert_eq!(*m.state(), LoginState::Failed);

        // Credentials are compared case-sensitively.
        m.set_username("QA_TESTER").unwrap();
        m.set_password("password123").unwrap();
        m.submit(&clock).unwrap();
        clock.advance(Duration::from_millis(2000));
        m.poll(&clock);
        assert_eq!(*m.state(), LoginState::Failed);
    }

    #[test]
    fn submit_disabled_while_pending() {
        let (mut m, clock) = machine();
        fill_and_submit(&mut m, &clock, "qa_tester", "password123");
        assert!(m.submit(&clock).is_err());
        assert!(!m.inputs_enabled());
        assert!(m.set_username("other").is_err());
    }

    #[test]
    fn success_surface_is_shown_once_per_submission() {
        let (mut m, clock) = machine();
        fill_and_submit(&mut m, &clock, "qa_tester", "password123");
        clock.advance(Duration::from_millis(1500));
        m.poll(&clock);
        assert_eq!(*m.state(), LoginState::Success);

        // Polling again does not produce a second transition, and a
        // new submit is rejected until the surface is dismissed.
        m.poll(&clock);
        assert_eq!(*m.state(), LoginState::Success);
        assert!(m.submit(&clock).is_err());
    }

    #[test]
    fn dismiss_clears_fields_and_returns_to_idle() {
        let (mut m, clock) = machine();
        fill_and_submit(&mut m, &clock, "qa_tester", "password123");
        clock.advance(Duration::from_millis(1500));
        m.poll(&clock);

        m.dismiss().unwrap();
        assert_eq!(*m.state(), LoginState::Idle);
        assert_eq!(m.username(), "");
        assert_eq!(m.password(), "");
    }

    #[test]
    fn failure_keeps_fields_and_allows_retry() {
        let (mut m, clock) = machine();
        fill_and_submit(&mut m, &clock, "qa_tester", "wrong");
        clock.advance(Duration::from_millis(1500));
        m.poll(&clock);
        assert_eq!(*m.state(), LoginState::Failed);
        assert_eq!(m.username(), "qa_tester");
        assert!(m.dismiss().is_err());

        m.set_password("password123").unwrap();
        m.submit(&clock).unwrap();
        clock.advance(Duration::from_millis(1500));
        m.poll(&clock);
        assert_eq!(*m.state(), LoginState::Success);
    }
}
