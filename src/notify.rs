//! Single-slot toast shared by every view. Last writer wins.

use crate::schedule::Deferred;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Failure,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub tone: Tone,
}

#[derive(Debug)]
pub struct NotificationChannel {
    timeout: Duration,
    current: Option<Notification>,
    expiry: Option<Deferred<()>>,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl NotificationChannel {
    pub fn new(timeout: Duration) -> Self {
        NotificationChannel {
            timeout,
            current: None,
            expiry: None,
        }
    }

    /// Replaces whatever is showing and restarts the expiry clock.
    pub fn notify(&mut self, message: impl Into<String>, tone: Tone, now: Instant) {
        let message = message.into();
        debug!(%message, ?tone, "Notification");
        self.current = Some(Notification { message, tone });
        self.expiry = Some(Deferred::after(self.timeout, now, ()));
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) {
        self.notify(message, Tone::Success, now);
    }

    pub fn failure(&mut self, message: impl Into<String>, now: Instant) {
        self.notify(message, Tone::Failure, now);
    }

    pub fn info(&mut self, message: impl Into<String>, now: Instant) {
        self.notify(message, Tone::Info, now);
    }

    pub fn dismiss(&mut self) {
        self.current = None;
        self.expiry = None;
    }

    pub fn tick(&mut self, now: Instant) {
        if self.expiry.as_ref().is_some_and(|e| e.is_due(now)) {
            self.dismiss();
        }
    }

    pub fn current(&self, now: Instant) -> Option<&Notification> {
        match &self.expiry {
            Some(expiry) if !expiry.is_due(now) => self.current.as_ref(),
            _ => None,
        }
    }

    pub fn is_showing(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_notify_replaces_first() {
        let start = Instant::now();
        let mut channel = NotificationChannel::default();
        channel.success("A", start);
        channel.success("B", start + Duration::from_millis(1000));
        let shown = channel
            .current(start + Duration::from_millis(1500))
            .map(|n| n.message.as_str());
        assert_eq!(shown, Some("B"));
    }

    #[test]
    fn clears_after_timeout() {
        let start = Instant::now();
        let mut channel = NotificationChannel::default();
        channel.info("Saved", start);
        channel.tick(start + Duration::from_millis(2999));
        assert!(channel.is_showing());
        channel.tick(start + DEFAULT_TIMEOUT);
        assert!(!channel.is_showing());
        assert!(channel.current(start + DEFAULT_TIMEOUT).is_none());
    }

    #[test]
    fn replacement_restarts_the_window() {
        let start = Instant::now();
        let mut channel = NotificationChannel::new(Duration::from_millis(3000));
        channel.success("A", start);
        channel.success("B", start + Duration::from_millis(2000));
        channel.tick(start + Duration::from_millis(3500));
        assert_eq!(
            channel.current(start + Duration::from_millis(3500)).map(|n| n.tone),
            Some(Tone::Success)
        );
        channel.tick(start + Duration::from_millis(5000));
        assert!(!channel.is_showing());
    }

    #[test]
    fn manual_dismiss() {
        let now = Instant::now();
        let mut channel = NotificationChannel::default();
        channel.failure("Could not save", now);
        channel.dismiss();
        assert!(channel.current(now).is_none());
    }
}
