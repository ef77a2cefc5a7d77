//! Heartbeat logging for long-running processes

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Tracks heartbeat intervals for periodic status logging
pub struct Heartbeat {
    interval: Duration,
    last_beat: DateTime<Utc>,
    beats: u64,
}

impl Heartbeat {
    /// Create a new heartbeat with the given interval in seconds
    pub fn new(interval_secs: u64) -> Self {
        Self::with_interval(Duration::from_secs(interval_secs))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            last_beat: Utc::now(),
            beats: 0,
        }
    }

    /// Check if enough time has passed since the last beat
    pub fn should_beat(&self) -> bool {
        let elapsed = Utc::now().signed_duration_since(self.last_beat);
        elapsed.to_std().unwrap_or_default() >= self.interval
    }

    /// Record a heartbeat at the current time
    pub fn beat(&mut self) {
        self.last_beat = Utc::now();
        self.beats += 1;
    }

    /// Beat if due; returns whether it did
    pub fn tick(&mut self) -> bool {
        if self.should_beat() {
            self.beat();
            true
        } else {
            false
        }
    }

    /// Number of beats recorded so far
    pub fn beats(&self) -> u64 {
        self.beats
    }

    pub fn last_beat(&self) -> DateTime<Utc> {
        self.last_beat
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_beats_immediately() {
        let mut heartbeat = Heartbeat::with_interval(Duration::ZERO);
        assert!(heartbeat.tick());
        assert!(heartbeat.tick());
        assert_eq!(heartbeat.beats(), 2);
    }

    #[test]
    fn long_interval_waits() {
        let mut heartbeat = Heartbeat::new(3600);
        assert!(!heartbeat.should_beat());
        assert!(!heartbeat.tick());
        assert_eq!(heartbeat.beats(), 0);
        assert_eq!(heartbeat.interval(), Duration::from_secs(3600));
    }
}
