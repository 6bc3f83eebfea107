//! Simulated network latency.
//!
//! A trigger sets a pending flag, waits a fixed duration, then shows a
//! success indicator. Failure is not modelled. Concurrent triggers are
//! prevented by disabling the control while pending; unlike the one-shot
//! visibility timers, the loader can be triggered again once complete.

use crate::clock::Clock;
use sandbox_common::{Error, Result};

/// Fixed simulated round-trip time.
pub const LATENCY_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Idle,
    Pending { deadline_ms: u64 },
    Complete,
}

#[derive(Debug)]
pub struct AsyncLoader {
    state: LoaderState,
    latency_ms: u64,
}

impl AsyncLoader {
    pub fn new() -> Self {
        Self::with_latency(LATENCY_MS)
    }

    pub fn with_latency(latency_ms: u64) -> Self {
        Self {
            state: LoaderState::Idle,
            latency_ms,
        }
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn trigger_enabled(&self) -> bool {
        !matches!(self.state, LoaderState::Pending { .. })
    }

    /// Start a simulated request. Restarting clears a previous success
    /// indicator; triggering while pending is rejected.
    pub fn trigger(&mut self, clock: &dyn Clock) -> Result<()> {
        if !self.trigger_enabled() {
            return Err(Error::InvalidStateTransition {
                from: "pending".to_string(),
                to: "pending".to_string(),
            });
        }
        self.state = LoaderState::Pending {
            deadline_ms: clock.now_ms() + self.latency_ms,
        };
        Ok(())
    }

    pub fn poll(&mut self, clock: &dyn Clock) {
        if let LoaderState::Pending { deadline_ms } = self.state {
            if clock.now_ms() >= deadline_ms {
                self.state = LoaderState::Complete;
            }
        }
    }

    pub fn complete(&self) -> bool {
        self.state == LoaderState::Complete
    }
}

impl Default for AsyncLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    #[test]
    fn loader_always_succeeds_after_fixed_delay() {
        let clock = ManualClock::new();
        let mut loader = AsyncLoader::new();

        loader.trigger(&clock).unwrap();
        assert!(!loader.trigger_enabled());

        clock.advance(Duration::from_millis(2999));
        loader.poll(&clock);
        assert!(!loader.complete());

        clock.advance(Duration::from_millis(1));
        loader.poll(&clock);
        assert!(loader.complete());
    }

    #[test]
    fn concurrent_trigger_is_rejected_but_retrigger_works() {
        let clock = ManualClock::new();
        let mut loader = AsyncLoader::new();

        loader.trigger(&clock).unwrap();
        assert!(loader.trigger(&clock).is_err());

        clock.advance(Duration::from_millis(3000));
        loader.poll(&clock);

        // A fresh trigger clears the success indicator.
        loader.trigger(&clock).unwrap();
        assert!(!loader.complete());
    }
}
