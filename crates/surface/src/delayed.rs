//! One-shot delayed-visibility timers.
//!
//! Each timer is armed explicitly by a user action, fires exactly once
//! after a fixed duration, and cannot be re-armed or cancelled once armed.
//! The trigger control stays disabled for the rest of the arm cycle, which
//! keeps explicit-wait test strategies deterministic.

use crate::clock::Clock;
use sandbox_common::{Error, Result};

/// Fixed delay before the appear/disappear transition fires.
pub const VISIBILITY_DELAY_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Armed { deadline_ms: u64 },
    Fired,
}

/// A timer that fires at most once per arm cycle.
#[derive(Debug)]
pub struct OneShotTimer {
    state: TimerState,
    duration_ms: u64,
}

impl OneShotTimer {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            state: TimerState::Idle,
            duration_ms,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// The trigger control is enabled only before the first arm.
    pub fn can_arm(&self) -> bool {
        self.state == TimerState::Idle
    }

    pub fn arm(&mut self, clock: &dyn Clock) -> Result<()> {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Armed {
                    deadline_ms: clock.now_ms() + self.duration_ms,
                };
                Ok(())
            }
            TimerState::Armed { .. } => Err(Error::InvalidStateTransition {
                from: "armed".to_string(),
                to: "armed".to_string(),
            }),
            TimerState::Fired => Err(Error::InvalidStateTransition {
                from: "fired".to_string(),
                to: "armed".to_string(),
            }),
        }
    }

    pub fn poll(&mut self, clock: &dyn Clock) {
        if let TimerState::Armed { deadline_ms } = self.state {
            if clock.now_ms() >= deadline_ms {
                self.state = TimerState::Fired;
            }
        }
    }

    pub fn fired(&self) -> bool {
        self.state == TimerState::Fired
    }
}

/// The two independent timers of the async page: "appear" adds an element
/// to the surface, "disappear" removes one.
#[derive(Debug)]
pub struct DelayedVisibility {
    appear: OneShotTimer,
    disappear: OneShotTimer,
}

impl DelayedVisibility {
    pub fn new() -> Self {
        Self {
            appear: OneShotTimer::new(VISIBILITY_DELAY_MS),
            disappear: OneShotTimer::new(VISIBILITY_DELAY_MS),
        }
    }

    pub fn start_appear(&mut self, clock: &dyn Clock) -> Result<()> {
        self.appear.arm(clock)
    }

    pub fn start_disappear(&mut self, clock: &dyn Clock) -> Result<()> {
        self.disappear.arm(clock)
    }

    pub fn poll(&mut self, clock: &dyn Clock) {
        self.appear.poll(clock);
        self.disappear.poll(clock);
    }

    /// The delayed element is absent until its timer fires.
    pub fn appeared(&self) -> bool {
        self.appear.fired()
    }

    /// The doomed element is present until its timer fires.
    pub fn target_visible(&self) -> bool {
        !self.disappear.fired()
    }

    pub fn appear_trigger_enabled(&self) -> bool {
        self.appear.can_arm()
    }

    pub fn disappear_trigger_enabled(&self) -> bool {
        self.disappear.can_arm()
    }
}

impl Default for DelayedVisibility {
    fn default() -> Self {
        Self::new()
    }
}
