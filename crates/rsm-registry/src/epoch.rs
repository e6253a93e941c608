//! Epoch clock
//!
//! Pure conversion between wall-clock timestamps and the monotonic epoch
//! counter. Two immutable configuration values, no state, no failure modes
//! beyond construction-time validation.

use crate::error::{RegistryError, RegistryResult};
use rsm_types::{DurationSecs, Epoch, Timestamp};
use serde::{Deserialize, Serialize};

/// Fixed-duration epoch clock.
///
/// `epoch(t) = floor((t - origin) / epoch_duration)`, saturating to epoch 0
/// for timestamps before the origin.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EpochClock {
    origin: Timestamp,
    epoch_duration: DurationSecs,
}

impl EpochClock {
    /// Create a clock. Fails with `InvalidEpochDuration` if the duration is 0.
    pub fn new(origin: Timestamp, epoch_duration: DurationSecs) -> RegistryResult<Self> {
        if epoch_duration == 0 {
            return Err(RegistryError::InvalidEpochDuration);
        }
        Ok(Self {
            origin,
            epoch_duration,
        })
    }

    /// Epoch containing timestamp `now`.
    pub fn epoch_at(&self, now: Timestamp) -> Epoch {
        now.saturating_sub(self.origin) / self.epoch_duration
    }

    /// Epoch following the one containing `now`. Scheduled membership
    /// changes always target this epoch.
    pub fn next_epoch_at(&self, now: Timestamp) -> Epoch {
        self.epoch_at(now).saturating_add(1)
    }

    /// Start timestamp of epoch `epoch`.
    pub fn epoch_start(&self, epoch: Epoch) -> Timestamp {
        self.origin
            .saturating_add(epoch.saturating_mul(self.epoch_duration))
    }

    /// Configured epoch duration in seconds.
    pub fn epoch_duration(&self) -> DurationSecs {
        self.epoch_duration
    }

    /// Configured origin timestamp.
    pub fn origin(&self) -> Timestamp {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_duration() {
        assert_eq!(
            EpochClock::new(0, 0).unwrap_err(),
            RegistryError::InvalidEpochDuration
        );
    }

    #[test]
    fn test_epoch_arithmetic() {
        let clock = EpochClock::new(1_000, 100).unwrap();

        assert_eq!(clock.epoch_at(1_000), 0);
        assert_eq!(clock.epoch_at(1_099), 0);
        assert_eq!(clock.epoch_at(1_100), 1);
        assert_eq!(clock.epoch_at(2_050), 10);

        assert_eq!(clock.next_epoch_at(1_050), 1);
        assert_eq!(clock.next_epoch_at(1_100), 2);
    }

    #[test]
    fn test_epoch_start_inverts_epoch_at() {
        let clock = EpochClock::new(1_000, 100).unwrap();

        for epoch in [0, 1, 7, 42] {
            let start = clock.epoch_start(epoch);
            assert_eq!(clock.epoch_at(start), epoch);
            assert_eq!(clock.epoch_at(start + 99), epoch);
        }
    }

    #[test]
    fn test_next_epoch_saturates_at_counter_ceiling() {
        let clock = EpochClock::new(0, 1).unwrap();
        assert_eq!(clock.epoch_at(u64::MAX), u64::MAX);
        assert_eq!(clock.next_epoch_at(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_saturates_before_origin() {
        let clock = EpochClock::new(1_000, 100).unwrap();
        assert_eq!(clock.epoch_at(0), 0);
        assert_eq!(clock.epoch_at(999), 0);
    }
}
