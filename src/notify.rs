//! Notification area - transient, auto-dismissing messages
//!
//! Producers only append. The shell prunes expired entries on a tick and
//! renders the rest newest-first.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::constants::{ERROR_TOAST_TTL, INFO_TOAST_TTL, SUCCESS_TOAST_TTL};

/// Upper bound on queued notifications; oldest are dropped first
const MAX_NOTIFICATIONS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
}

impl Level {
    fn ttl(&self) -> Duration {
        match self {
            Level::Success => SUCCESS_TOAST_TTL,
            Level::Error => ERROR_TOAST_TTL,
            Level::Info => INFO_TOAST_TTL,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    expires_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Append-only notification queue
#[derive(Clone, Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push_at(Level::Success, message, Instant::now());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push_at(Level::Error, message, Instant::now());
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push_at(Level::Info, message, Instant::now());
    }

    pub fn push_at(&mut self, level: Level, message: impl Into<String>, now: Instant) {
        if self.queue.len() >= MAX_NOTIFICATIONS {
            self.queue.pop_front();
        }
        self.queue.push_back(Notification {
            level,
            message: message.into(),
            expires_at: now + level.ttl(),
        });
    }

    /// Drop expired entries; returns true if anything was removed
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.queue.len();
        self.queue.retain(|n| !n.is_expired(now));
        self.queue.len() != before
    }

    /// Newest first
    pub fn visible(&self) -> Vec<Notification> {
        self.queue.iter().rev().cloned().collect()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.queue.back()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_follows_level_ttl() {
        let t0 = Instant::now();
        let mut n = Notifications::new();
        n.push_at(Level::Success, "saved", t0);
        n.push_at(Level::Error, "failed", t0);

        assert!(!n.prune(t0 + Duration::from_millis(2999)));
        assert_eq!(n.len(), 2);

        assert!(n.prune(t0 + Duration::from_millis(3000)));
        assert_eq!(n.len(), 1);
        assert_eq!(n.latest().unwrap().level, Level::Error);

        n.prune(t0 + Duration::from_millis(5000));
        assert!(n.is_empty());
    }

    #[test]
    fn test_visible_is_newest_first_and_bounded() {
        let t0 = Instant::now();
        let mut n = Notifications::new();
        for i in 0..(MAX_NOTIFICATIONS + 2) {
            n.push_at(Level::Info, format!("msg {}", i), t0);
        }
        let visible = n.visible();
        assert_eq!(visible.len(), MAX_NOTIFICATIONS);
        assert_eq!(visible[0].message, format!("msg {}", MAX_NOTIFICATIONS + 1));
        assert_eq!(visible.last().unwrap().message, "msg 2");
    }
}
