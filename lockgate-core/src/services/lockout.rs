//! Per-identity failure tracking with a sliding lockout window.
//!
//! Each known identity owns one failure record: a countdown of remaining
//! attempts plus the instant of the most recent failure. When the countdown
//! reaches zero the identity is locked out until the window measured from
//! that last failure has elapsed. Expiry is observed lazily from queries;
//! there is no background timer.
//!
//! # Thread safety
//!
//! The record map is a [`DashMap`], so first-time record creation is
//! race-free (exactly one record per identity, ever) and all mutation of a
//! record happens under its shard's write lock. Concurrent failures against
//! one identity serialize their decrements; distinct identities only contend
//! when they hash to the same shard.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;

use crate::{clock::Clock, directory::IdentityDirectory};

/// Tuning knobs for the lockout tracker.
#[derive(Debug, Clone)]
pub struct LockoutConfig {
    /// Failed attempts a fresh identity may accumulate before lockout.
    pub max_attempts: u32,
    /// How long an exhausted identity stays blocked, measured from its most
    /// recent failure.
    pub lockout_window: Duration,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            lockout_window: Duration::minutes(5),
        }
    }
}

/// Point-in-time report of one identity's lockout state.
#[derive(Debug, Clone, Serialize)]
pub struct LockoutStatus {
    pub identity: String,
    /// Whether the identity participates in tracking at all.
    pub known: bool,
    pub remaining_attempts: u32,
    pub locked: bool,
    /// When the current lockout lapses; only set while `locked`.
    pub locked_until: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct FailureRecord {
    remaining_attempts: u32,
    /// Instant of the most recent failure; `None` before any failure and
    /// after an expiry reset.
    last_failure: Option<DateTime<Utc>>,
}

impl FailureRecord {
    fn fresh(max_attempts: u32) -> Self {
        Self {
            remaining_attempts: max_attempts,
            last_failure: None,
        }
    }

    /// Consume one attempt (never below zero) and re-anchor the window.
    fn register_failure(&mut self, now: DateTime<Utc>) {
        if self.remaining_attempts > 0 {
            self.remaining_attempts -= 1;
        }
        self.last_failure = Some(now);
    }

    /// Reset to a fresh record once the window since the last failure has
    /// elapsed. Only queries call this; failure registration deliberately
    /// does not.
    fn reset_if_expired(&mut self, now: DateTime<Utc>, window: Duration, max_attempts: u32) {
        if let Some(last) = self.last_failure {
            if now - last >= window {
                self.remaining_attempts = max_attempts;
                self.last_failure = None;
            }
        }
    }

    fn is_exhausted(&self) -> bool {
        self.remaining_attempts == 0
    }
}

/// Tracks failed attempts per known identity and answers lockout queries.
///
/// Identities outside the [`IdentityDirectory`] are exempt: queries report
/// them as not locked out and failures against them are dropped without
/// creating any state.
pub struct LockoutService<C: Clock, D: IdentityDirectory> {
    records: DashMap<String, FailureRecord>,
    clock: Arc<C>,
    directory: Arc<D>,
    config: LockoutConfig,
}

impl<C: Clock, D: IdentityDirectory> LockoutService<C, D> {
    pub fn new(clock: Arc<C>, directory: Arc<D>, config: LockoutConfig) -> Self {
        Self {
            records: DashMap::new(),
            clock,
            directory,
            config,
        }
    }

    pub fn config(&self) -> &LockoutConfig {
        &self.config
    }

    /// Whether further attempts for `identity` are currently blocked.
    ///
    /// Querying is what observes window expiry: if the window since the last
    /// failure has elapsed, the record resets to a full attempt budget as a
    /// side effect and the identity reads as unlocked.
    pub fn is_locked_out(&self, identity: &str) -> bool {
        if !self.directory.is_known(identity) {
            return false;
        }
        let now = self.clock.now();
        let mut record = self.record(identity);
        record.reset_if_expired(now, self.config.lockout_window, self.config.max_attempts);
        record.is_exhausted()
    }

    /// Record one failed attempt for `identity`.
    ///
    /// Decrements the remaining-attempt budget (never below zero) and
    /// re-anchors the lockout window at the current instant. No expiry check
    /// happens here: a failure landing after the window has lapsed still
    /// extends the stale record until the next query resets it.
    pub fn register_failed_attempt(&self, identity: &str) {
        if !self.directory.is_known(identity) {
            return;
        }
        let now = self.clock.now();
        let mut record = self.record(identity);
        let was_open = !record.is_exhausted();
        record.register_failure(now);

        if was_open && record.is_exhausted() {
            tracing::warn!(identity, "identity locked out after repeated failures");
        } else {
            tracing::debug!(
                identity,
                remaining = record.remaining_attempts,
                "failed attempt recorded"
            );
        }
    }

    /// Full lockout report for `identity`, with the same query semantics
    /// (including the expiry reset) as [`is_locked_out`](Self::is_locked_out).
    pub fn status(&self, identity: &str) -> LockoutStatus {
        if !self.directory.is_known(identity) {
            return LockoutStatus {
                identity: identity.to_string(),
                known: false,
                remaining_attempts: self.config.max_attempts,
                locked: false,
                locked_until: None,
            };
        }
        let now = self.clock.now();
        let mut record = self.record(identity);
        record.reset_if_expired(now, self.config.lockout_window, self.config.max_attempts);

        let locked = record.is_exhausted();
        LockoutStatus {
            identity: identity.to_string(),
            known: true,
            remaining_attempts: record.remaining_attempts,
            locked,
            locked_until: if locked {
                record
                    .last_failure
                    .map(|last| last + self.config.lockout_window)
            } else {
                None
            },
        }
    }

    /// Locate or lazily create the record for a known identity. The entry
    /// API makes the first insert win under concurrent access.
    fn record(&self, identity: &str) -> dashmap::mapref::one::RefMut<'_, String, FailureRecord> {
        self.records
            .entry(identity.to_string())
            .or_insert_with(|| FailureRecord::fresh(self.config.max_attempts))
    }
}
