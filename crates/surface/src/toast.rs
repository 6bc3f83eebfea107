//! Toast notification queue.
//!
//! Toasts are appended in insertion order, carry a monotonic id, and each
//! self-removes exactly one fixed lifetime after creation, independently
//! of every other toast. There is no deduplication and no global clear.

use crate::clock::Clock;
use serde::Serialize;

/// Fixed lifetime of a toast.
pub const TOAST_LIFETIME_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub created_ms: u64,
}

#[derive(Debug)]
pub struct ToastQueue {
    next_id: u64,
    lifetime_ms: u64,
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::with_lifetime(TOAST_LIFETIME_MS)
    }

    pub fn with_lifetime(lifetime_ms: u64) -> Self {
        Self {
            next_id: 1,
            lifetime_ms,
            toasts: Vec::new(),
        }
    }

    pub fn push(&mut self, kind: ToastKind, message: &str, clock: &dyn Clock) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            kind,
            message: message.to_string(),
            created_ms: clock.now_ms(),
        });
        id
    }

    /// Drop every toast whose lifetime has elapsed.
    pub fn expire(&mut self, clock: &dyn Clock) {
        let now = clock.now_ms();
        let lifetime = self.lifetime_ms;
        self.toasts
            .retain(|toast| now < toast.created_ms + lifetime);
    }

    /// Live toasts in insertion order.
    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }
}

impl Default for ToastQueue {
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
    fn ids_are_monotonic_and_order_is_preserved() {
        let clock = ManualClock::new();
        let mut queue = ToastQueue::new();

        let a = queue.push(ToastKind::Success, "first", &clock);
        let b = queue.push(ToastKind::Error, "second", &clock);
        assert!(b > a);

        let visible: Vec<_> = queue.visible().iter().map(|t| t.id).collect();
        assert_eq!(visible, vec![a, b]);
    }

    #[test]
    fn each_toast_expires_independently() {
        let clock = ManualClock::new();
        let mut queue = ToastQueue::new();

        let first = queue.push(ToastKind::Success, "early", &clock);
        clock.advance(Duration::from_millis(2000));
        let second = queue.push(ToastKind::Success, "late", &clock);

        // First toast hits its lifetime; the later one is unaffected.
        clock.advance(Duration::from_millis(1000));
        queue.expire(&clock);
        let ids: Vec<_> = queue.visible().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second]);
        assert!(!ids.contains(&first));

        clock.advance(Duration::from_millis(2000));
        queue.expire(&clock);
        assert!(queue.visible().is_empty());
    }

    #[test]
    fn duplicate_messages_are_not_deduplicated() {
        let clock = ManualClock::new();
        let mut queue = ToastQueue::new();
        queue.push(ToastKind::Error, "same", &clock);
        queue.push(ToastKind::Error, "same", &clock);
        assert_eq!(queue.visible().len(), 2);
    }
}
