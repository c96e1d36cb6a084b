//! Frame clock.

use std::time::Duration;

/// Time of the current and previous frame, measured from an arbitrary
/// start by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ticks {
    now: Duration,
    previous: Duration,
}

impl Ticks {
    /// A clock at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
            previous: Duration::ZERO,
        }
    }

    /// Start a new frame at `now`. Time never runs backwards.
    pub fn update(&mut self, now: Duration) {
        self.previous = self.now;
        self.now = now.max(self.now);
    }

    /// Time of the current frame.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Time between the previous frame and this one.
    #[must_use]
    pub fn variation(&self) -> Duration {
        self.now.saturating_sub(self.previous)
    }
}
