//! Login throttling.
//!
//! Tracks failed login attempts per phone number and temporarily locks the
//! number after too many failures. State lives in process memory (moka), so
//! it resets on restart and is not shared between instances.

use std::time::{Duration, Instant};

use moka::ops::compute::Op;
use moka::sync::Cache;

/// Maximum failed attempts before lockout.
pub const MAX_FAILED_ATTEMPTS: u32 = 5;

/// Lockout duration (15 minutes).
pub const LOCKOUT_DURATION: Duration = Duration::from_secs(15 * 60);

/// Failed attempt tracking window (15 minutes).
pub const ATTEMPT_WINDOW: Duration = Duration::from_secs(15 * 60);

const MAX_TRACKED: u64 = 100_000;

#[derive(Debug, Clone, Copy)]
struct Attempts {
    count: u32,
    first_at: Instant,
}

/// Failed-login tracker.
#[derive(Clone)]
pub struct LockoutService {
    attempts: Cache<String, Attempts>,
    locked: Cache<String, Instant>,
    max_attempts: u32,
    lockout: Duration,
    window: Duration,
}

impl LockoutService {
    /// Create a tracker with the default limits.
    pub fn new() -> Self {
        Self::with_limits(MAX_FAILED_ATTEMPTS, LOCKOUT_DURATION, ATTEMPT_WINDOW)
    }

    /// Create a tracker with custom limits.
    pub fn with_limits(max_attempts: u32, lockout: Duration, window: Duration) -> Self {
        Self {
            attempts: Cache::builder()
                .max_capacity(MAX_TRACKED)
                .time_to_live(window)
                .build(),
            locked: Cache::builder()
                .max_capacity(MAX_TRACKED)
                .time_to_live(lockout)
                .build(),
            max_attempts: max_attempts.max(1),
            lockout,
            window,
        }
    }

    /// Check if a phone number is currently locked.
    pub fn is_locked(&self, phone: &str) -> bool {
        self.lockout_remaining(phone).is_some()
    }

    /// Remaining lockout time, if locked.
    pub fn lockout_remaining(&self, phone: &str) -> Option<Duration> {
        let since = self.locked.get(phone)?;
        self.lockout
            .checked_sub(since.elapsed())
            .filter(|d| !d.is_zero())
    }

    /// Record a failed login attempt.
    ///
    /// Returns (is_now_locked, attempts_remaining).
    pub fn record_failed_attempt(&self, phone: &str) -> (bool, u32) {
        let now = Instant::now();
        let window = self.window;
        let mut recorded = Attempts {
            count: 1,
            first_at: now,
        };

        // Read-modify-write under the entry lock so parallel failures all count.
        self.attempts
            .entry_by_ref(phone)
            .and_compute_with(|entry| {
                if let Some(previous) = entry
                    .map(|e| e.into_value())
                    .filter(|a| now.duration_since(a.first_at) < window)
                {
                    recorded = Attempts {
                        count: previous.count + 1,
                        first_at: previous.first_at,
                    };
                }
                Op::Put(recorded)
            });

        if recorded.count >= self.max_attempts {
            self.locked.insert(phone.to_string(), now);
            self.attempts.invalidate(phone);
            tracing::warn!(
                phone = %crate::models::mask_phone(phone),
                "login locked due to failed attempts"
            );
            return (true, 0);
        }

        (false, self.max_attempts - recorded.count)
    }

    /// Clear failed attempts after a successful login.
    pub fn clear_attempts(&self, phone: &str) {
        self.attempts.invalidate(phone);
    }

    /// Clear all lockout state (both attempts and lock) for a phone number.
    pub fn clear_all(&self, phone: &str) {
        self.attempts.invalidate(phone);
        self.locked.invalidate(phone);
    }
}

impl Default for LockoutService {
    fn default() -> Self {
        Self::new()
    }
}

/// User-facing lockout message.
pub fn lockout_message(remaining: Option<Duration>) -> String {
    match remaining {
        Some(d) => match d.as_secs().div_ceil(60).max(1) {
            1 => "Too many failed attempts. Try again in 1 minute.".to_string(),
            minutes => format!("Too many failed attempts. Try again in {minutes} minutes."),
        },
        None => "Too many failed attempts. Try again later.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locks_after_max_attempts() {
        let lockout = LockoutService::with_limits(3, Duration::from_secs(60), Duration::from_secs(60));
        assert_eq!(lockout.record_failed_attempt("0700"), (false, 2));
        assert_eq!(lockout.record_failed_attempt("0700"), (false, 1));
        assert!(!lockout.is_locked("0700"));
        assert_eq!(lockout.record_failed_attempt("0700"), (true, 0));
        assert!(lockout.is_locked("0700"));
        assert!(lockout.lockout_remaining("0700").is_some());
    }

    #[test]
    fn numbers_are_tracked_independently() {
        let lockout = LockoutService::with_limits(2, Duration::from_secs(60), Duration::from_secs(60));
        lockout.record_failed_attempt("a");
        lockout.record_failed_attempt("a");
        assert!(lockout.is_locked("a"));
        assert!(!lockout.is_locked("b"));
    }

    #[test]
    fn clear_attempts_resets_counter() {
        let lockout = LockoutService::with_limits(3, Duration::from_secs(60), Duration::from_secs(60));
        lockout.record_failed_attempt("0700");
        lockout.record_failed_attempt("0700");
        lockout.clear_attempts("0700");
        assert_eq!(lockout.record_failed_attempt("0700"), (false, 2));
    }

    #[test]
    fn clear_all_unlocks() {
        let lockout = LockoutService::with_limits(1, Duration::from_secs(60), Duration::from_secs(60));
        assert_eq!(lockout.record_failed_attempt("0700"), (true, 0));
        lockout.clear_all("0700");
        assert!(!lockout.is_locked("0700"));
    }

    #[test]
    fn parallel_failures_are_all_counted() {
        const THREADS: u32 = 8;
        const PER_THREAD: u32 = 25;
        let max = THREADS * PER_THREAD + 10;
        let lockout =
            LockoutService::with_limits(max, Duration::from_secs(60), Duration::from_secs(60));

        std::thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| {
                    for _ in 0..PER_THREAD {
                        lockout.record_failed_attempt("0700");
                    }
                });
            }
        });

        // One more failure: exactly THREADS * PER_THREAD + 1 recorded so far.
        assert_eq!(
            lockout.record_failed_attempt("0700"),
            (false, max - THREADS * PER_THREAD - 1)
        );
    }

    #[test]
    fn message_rounds_up_minutes() {
        assert_eq!(
            lockout_message(Some(Duration::from_secs(30))),
            "Too many failed attempts. Try again in 1 minute."
        );
        assert_eq!(
            lockout_message(Some(LOCKOUT_DURATION)),
            "Too many failed attempts. Try again in 15 minutes."
        );
        assert_eq!(
            lockout_message(Some(Duration::from_secs(14 * 60 + 1))),
            "Too many failed attempts. Try again in 15 minutes."
        );
        assert_eq!(
            lockout_message(None),
            "Too many failed attempts. Try again later."
        );
    }
}
