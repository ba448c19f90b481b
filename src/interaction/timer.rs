//! One-shot idle timer for resuming auto-rotation.
//!
//! At most one deadline is pending at any time: arming replaces whatever was
//! pending, cancelling an idle timer does nothing, and a deadline is consumed
//! by the poll that observes it.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct IdleTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl IdleTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re)start the countdown from `now`.
    pub fn arm(&mut self, now: Instant) {
        if self.deadline.is_some() {
            log::debug!("idle timer re-armed");
        } else {
            log::debug!("idle timer armed ({} ms)", self.delay.as_millis());
        }
        self.deadline = Some(now + self.delay);
    }

    /// Drop the pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        let was_armed = self.deadline.take().is_some();
        if was_armed {
            log::debug!("idle timer cancelled");
        }
        was_armed
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left before firing, if armed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|d| d.checked_duration_since(now).unwrap_or(Duration::ZERO))
    }

    /// `true` exactly once when the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let t0 = Instant::now();
        let mut timer = IdleTimer::new(Duration::from_millis(2500));
        timer.arm(t0);
        assert!(!timer.poll(t0 + Duration::from_millis(2499)));
        assert!(timer.poll(t0 + Duration::from_millis(2500)));
        assert!(!timer.poll(t0 + Duration::from_millis(9000)));
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_rearm_replaces_deadline() {
        let t0 = Instant::now();
        let mut timer = IdleTimer::new(Duration::from_millis(1000));
        timer.arm(t0);
        timer.arm(t0 + Duration::from_millis(800));
        assert!(!timer.poll(t0 + Duration::from_millis(1200)));
        assert!(timer.poll(t0 + Duration::from_millis(1800)));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let t0 = Instant::now();
        let mut timer = IdleTimer::new(Duration::from_millis(100));
        assert!(!timer.cancel());
        timer.arm(t0);
        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert!(!timer.poll(t0 + Duration::from_secs(1)));

        // Cancel after firing is also harmless
        timer.arm(t0);
        assert!(timer.poll(t0 + Duration::from_secs(1)));
        assert!(!timer.cancel());
    }

    #[test]
    fn test_remaining() {
        let t0 = Instant::now();
        let mut timer = IdleTimer::new(Duration::from_millis(500));
        assert_eq!(timer.remaining(t0), None);
        timer.arm(t0);
        assert_eq!(
            timer.remaining(t0 + Duration::from_millis(200)),
            Some(Duration::from_millis(300))
        );
        assert_eq!(timer.remaining(t0 + Duration::from_secs(2)), Some(Duration::ZERO));
    }
}
