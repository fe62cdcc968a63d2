//! Pluggable time source.
//!
//! The lockout window is measured against a [`Clock`] rather than the system
//! time directly, so that expiry behavior can be driven deterministically in
//! tests and, when the server runs in testing mode, over the clock-control
//! routes. Production deployments use [`SystemClock`]; everything else uses
//! an [`AdjustableClock`] that reads system time until pinned.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Utc};

/// A monotonically non-decreasing wall-clock reading.
pub trait Clock: Send + Sync + 'static {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// Sentinel for "not pinned"; chrono cannot represent this instant, so it
// never collides with a real pin.
const UNPINNED: i64 = i64::MIN;

/// Clock whose reading can be pinned to an absolute instant at runtime.
///
/// While unpinned it behaves exactly like [`SystemClock`]. Pinning stores an
/// epoch-millisecond reading that every subsequent [`Clock::now`] call
/// returns until the pin is moved or cleared. The handle is cheap to share
/// behind an `Arc` and safe to mutate from any thread.
#[derive(Debug)]
pub struct AdjustableClock {
    pinned_millis: AtomicI64,
}

impl Default for AdjustableClock {
    fn default() -> Self {
        Self::new()
    }
}

impl AdjustableClock {
    pub fn new() -> Self {
        Self {
            pinned_millis: AtomicI64::new(UNPINNED),
        }
    }

    /// Pin the clock to `instant`. Subsequent readings return `instant`
    /// until [`advance`](Self::advance), another pin, or [`clear`](Self::clear).
    pub fn pin(&self, instant: DateTime<Utc>) {
        self.pinned_millis
            .store(instant.timestamp_millis(), Ordering::SeqCst);
    }

    /// Move the clock forward by `delta`, pinning it at the current reading
    /// first if it is not pinned yet.
    pub fn advance(&self, delta: Duration) {
        let base = match self.pinned_millis.load(Ordering::SeqCst) {
            UNPINNED => Utc::now().timestamp_millis(),
            millis => millis,
        };
        self.pinned_millis
            .store(base + delta.num_milliseconds(), Ordering::SeqCst);
    }

    /// Restore system time.
    pub fn clear(&self) {
        self.pinned_millis.store(UNPINNED, Ordering::SeqCst);
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned_millis.load(Ordering::SeqCst) != UNPINNED
    }
}

impl Clock for AdjustableClock {
    fn now(&self) -> DateTime<Utc> {
        match self.pinned_millis.load(Ordering::SeqCst) {
            UNPINNED => Utc::now(),
            millis => DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpinned_clock_tracks_system_time() {
        let clock = AdjustableClock::new();
        assert!(!clock.is_pinned());

        let before = Utc::now();
        let reading = clock.now();
        let after = Utc::now();
        assert!(before <= reading && reading <= after);
    }

    #[test]
    fn pinned_clock_returns_the_pinned_instant() {
        let clock = AdjustableClock::new();
        let instant = DateTime::from_timestamp_millis(1_000_000_000).unwrap();

        clock.pin(instant);
        assert!(clock.is_pinned());
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), instant);
    }

    #[test]
    fn advance_moves_a_pinned_reading() {
        let clock = AdjustableClock::new();
        let instant = DateTime::from_timestamp_millis(1_000_000_000).unwrap();

        clock.pin(instant);
        clock.advance(Duration::minutes(5));
        assert_eq!(clock.now(), instant + Duration::minutes(5));
    }

    #[test]
    fn clear_restores_system_time() {
        let clock = AdjustableClock::new();
        clock.pin(DateTime::from_timestamp_millis(0).unwrap());
        clock.clear();

        assert!(!clock.is_pinned());
        // A cleared clock must not return the old pin.
        assert!(clock.now() > DateTime::from_timestamp_millis(0).unwrap());
    }
}
