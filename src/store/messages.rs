//! Auto-dismissing banner messages
//!
//! Each slot holds at most one message and at most one dismissal deadline.
//! Showing a new message replaces both, so an older deadline can never clear
//! a newer message. The event loop sleeps until [`MessageSlot::deadline`] and
//! then calls [`MessageSlot::expire`].

use std::time::Duration;
use tokio::time::Instant;

/// One banner (error or success) with its own timer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSlot {
    text: Option<String>,
    deadline: Option<Instant>,
}

impl MessageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message and restart the dismissal timer
    ///
    /// A zero duration keeps the message until it is cleared explicitly.
    pub fn show(&mut self, message: impl Into<String>, duration: Duration, now: Instant) {
        self.text = Some(message.into());
        self.deadline = if duration.is_zero() {
            None
        } else {
            Some(now + duration)
        };
    }

    /// Remove the message and cancel its timer
    pub fn clear(&mut self) {
        self.text = None;
        self.deadline = None;
    }

    /// Clear the message if its deadline has passed. Returns true if cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.clear();
                true
            }
            _ => false,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Pending dismissal time, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
