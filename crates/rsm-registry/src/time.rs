//! Pluggable timestamp capture
//!
//! The middleware never calls the system clock directly. Components take a
//! `TimeSource` at construction so deployments can substitute the host
//! ledger's notion of time and tests can drive epochs deterministically.

use rsm_types::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current wall-clock timestamp (unix seconds).
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// System clock time source.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Settable time source for tests and deterministic replay.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    now: AtomicU64,
}

impl ManualTimeSource {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    /// Set the current timestamp.
    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Advance the current timestamp by `secs`.
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_time_source() {
        let time = ManualTimeSource::new(1_000);
        assert_eq!(time.now(), 1_000);

        time.advance(500);
        assert_eq!(time.now(), 1_500);

        time.set(100);
        assert_eq!(time.now(), 100);
    }

    #[test]
    fn test_system_time_source_is_nonzero() {
        assert!(SystemTimeSource.now() > 0);
    }
}
