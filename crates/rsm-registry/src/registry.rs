//! Epoch-gated membership registry
//!
//! An insertion-ordered set of unique addresses whose membership changes
//! take effect only at epoch boundaries:
//!
//! - `register` schedules activation from the *next* epoch
//! - `pause` schedules deactivation from the *next* epoch
//! - `unpause` / `unregister` are gated behind a grace period: the entry
//!   must have been fully inactive for `grace_epochs` epochs first
//!
//! The grace period exists so a member cannot escape an in-flight slash
//! request by unregistering: any exposure that existed before
//! `disabled_epoch` remains provable via `is_active_at` until the grace
//! period elapses.
//!
//! The registry reads no clock. Every mutation takes the caller's current
//! epoch, and the scheduled epoch is always `current_epoch + 1`.

use crate::error::{RegistryError, RegistryResult};
use rsm_types::{Address, Epoch};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single membership entry.
///
/// `enabled_epoch == 0` means "never enabled"; `disabled_epoch == 0` means
/// "no pending disable". Registration always schedules for `current + 1`,
/// so a real enable epoch is never 0 and the sentinel is unambiguous.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub address: Address,
    pub enabled_epoch: Epoch,
    pub disabled_epoch: Epoch,
}

impl RegistryEntry {
    /// Active at `epoch` iff enabled by then and not yet disabled.
    pub fn is_active_at(&self, epoch: Epoch) -> bool {
        self.enabled_epoch != 0
            && self.enabled_epoch <= epoch
            && (self.disabled_epoch == 0 || epoch < self.disabled_epoch)
    }

    /// Removable (or reusable) once the disable has fully lapsed.
    ///
    /// A never-paused entry is not removable: `disabled_epoch == 0` means
    /// there is no lapsed disable to count the grace period from.
    fn is_removable(&self, current_epoch: Epoch, grace_epochs: u64) -> bool {
        self.disabled_epoch != 0
            && current_epoch >= self.disabled_epoch.saturating_add(grace_epochs)
    }

    fn check_removable(&self, current_epoch: Epoch, grace_epochs: u64) -> RegistryResult<()> {
        if self.is_removable(current_epoch, grace_epochs) {
            return Ok(());
        }
        let unlock_epoch = if self.disabled_epoch == 0 {
            Epoch::MAX
        } else {
            self.disabled_epoch.saturating_add(grace_epochs)
        };
        Err(RegistryError::ImmutabilityWindow {
            disabled_epoch: self.disabled_epoch,
            unlock_epoch,
        })
    }
}

/// Insertion-ordered set of [`RegistryEntry`] with O(1) membership tests.
///
/// Entries keep their position across pause/unpause; final removal compacts
/// with swap-with-last-and-pop, so removal does reorder the tail entry.
#[derive(Clone, Debug, Default)]
pub struct EpochGatedRegistry {
    entries: Vec<RegistryEntry>,
    positions: HashMap<Address, usize>,
}

impl EpochGatedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `address`, active from epoch `current_epoch + 1`.
    ///
    /// Fails with `AlreadyRegistered` while the address holds any entry
    /// whose disable has not fully lapsed. A removable entry is reused in
    /// place with a fresh `enabled_epoch`.
    pub fn register(
        &mut self,
        address: Address,
        current_epoch: Epoch,
        grace_epochs: u64,
    ) -> RegistryResult<()> {
        let next_epoch = current_epoch.saturating_add(1);
        if let Some(&position) = self.positions.get(&address) {
            let entry = &mut self.entries[position];
            if !entry.is_removable(current_epoch, grace_epochs) {
                return Err(RegistryError::AlreadyRegistered { address });
            }
            entry.enabled_epoch = next_epoch;
            entry.disabled_epoch = 0;
            return Ok(());
        }
        self.positions.insert(address, self.entries.len());
        self.entries.push(RegistryEntry {
            address,
            enabled_epoch: next_epoch,
            disabled_epoch: 0,
        });
        Ok(())
    }

    /// Schedule deactivation from epoch `current_epoch + 1`.
    ///
    /// Re-pausing before the scheduled epoch arrives re-sets the same future
    /// epoch. Re-pausing an entry whose disable already took effect moves
    /// the disable boundary forward, retroactively extending its active
    /// range; callers that want the entry gone should unregister instead.
    pub fn pause(&mut self, address: Address, current_epoch: Epoch) -> RegistryResult<()> {
        let entry = self.entry_mut(address)?;
        entry.disabled_epoch = current_epoch.saturating_add(1);
        Ok(())
    }

    /// Clear a lapsed disable, leaving `enabled_epoch` untouched so the
    /// entry's active history before the pause remains queryable.
    ///
    /// Fails with `ImmutabilityWindow` until the entry has been inactive for
    /// `grace_epochs` full epochs.
    pub fn unpause(
        &mut self,
        address: Address,
        current_epoch: Epoch,
        grace_epochs: u64,
    ) -> RegistryResult<()> {
        let entry = self.entry_mut(address)?;
        entry.check_removable(current_epoch, grace_epochs)?;
        entry.disabled_epoch = 0;
        Ok(())
    }

    /// Physically remove a lapsed entry; its position is reused by the entry
    /// that previously sat last.
    pub fn unregister(
        &mut self,
        address: Address,
        current_epoch: Epoch,
        grace_epochs: u64,
    ) -> RegistryResult<()> {
        let position = *self
            .positions
            .get(&address)
            .ok_or(RegistryError::NotRegistered { address })?;
        self.entries[position].check_removable(current_epoch, grace_epochs)?;

        self.entries.swap_remove(position);
        self.positions.remove(&address);
        if position < self.entries.len() {
            self.positions.insert(self.entries[position].address, position);
        }
        Ok(())
    }

    /// Historical membership predicate, usable as slashing evidence.
    pub fn is_active_at(&self, address: Address, epoch: Epoch) -> bool {
        self.positions
            .get(&address)
            .map(|&position| self.entries[position].is_active_at(epoch))
            .unwrap_or(false)
    }

    /// Every address active at `epoch`, in registry order. Computed fresh
    /// per call.
    pub fn active_at(&self, epoch: Epoch) -> Vec<Address> {
        self.entries
            .iter()
            .filter(|entry| entry.is_active_at(epoch))
            .map(|entry| entry.address)
            .collect()
    }

    /// Number of entries (active or not).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw positional lookup for external tooling and auditing.
    pub fn at(&self, position: usize) -> Option<&RegistryEntry> {
        self.entries.get(position)
    }

    /// Entry lookup by address.
    pub fn get(&self, address: Address) -> Option<&RegistryEntry> {
        self.positions
            .get(&address)
            .map(|&position| &self.entries[position])
    }

    pub fn contains(&self, address: Address) -> bool {
        self.positions.contains_key(&address)
    }

    /// Iterate entries in registry order.
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    fn entry_mut(&mut self, address: Address) -> RegistryResult<&mut RegistryEntry> {
        let position = *self
            .positions
            .get(&address)
            .ok_or(RegistryError::NotRegistered { address })?;
        Ok(&mut self.entries[position])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        [n; 20]
    }

    const GRACE: u64 = 3;

    #[test]
    fn test_register_activates_next_epoch() {
        let mut registry = EpochGatedRegistry::new();
        registry.register(addr(1), 10, GRACE).unwrap();

        assert!(!registry.is_active_at(addr(1), 10));
        assert!(registry.is_active_at(addr(1), 11));
        assert!(registry.is_active_at(addr(1), 100));
    }

    #[test]
    fn test_duplicate_register_rejected() {
        let mut registry = EpochGatedRegistry::new();
        registry.register(addr(1), 10, GRACE).unwrap();

        assert_eq!(
            registry.register(addr(1), 10, GRACE).unwrap_err(),
            RegistryError::AlreadyRegistered { address: addr(1) }
        );
        // Still rejected while a pending disable has not lapsed
        registry.pause(addr(1), 12).unwrap();
        assert_eq!(
            registry.register(addr(1), 13, GRACE).unwrap_err(),
            RegistryError::AlreadyRegistered { address: addr(1) }
        );
    }

    #[test]
    fn test_pause_deactivates_from_next_epoch() {
        let mut registry = EpochGatedRegistry::new();
        registry.register(addr(1), 10, GRACE).unwrap();
        registry.pause(addr(1), 20).unwrap();

        assert!(registry.is_active_at(addr(1), 20));
        assert!(!registry.is_active_at(addr(1), 21));
        assert!(!registry.is_active_at(addr(1), 500));
        // History before the disable stays provable
        assert!(registry.is_active_at(addr(1), 11));
    }

    #[test]
    fn test_repause_before_effect_resets_same_epoch() {
        let mut registry = EpochGatedRegistry::new();
        registry.register(addr(1), 10, GRACE).unwrap();
        registry.pause(addr(1), 20).unwrap();
        registry.pause(addr(1), 20).unwrap();

        assert_eq!(registry.get(addr(1)).unwrap().disabled_epoch, 21);
    }

    #[test]
    fn test_pause_unknown_address() {
        let mut registry = EpochGatedRegistry::new();
        assert_eq!(
            registry.pause(addr(9), 5).unwrap_err(),
            RegistryError::NotRegistered { address: addr(9) }
        );
    }

    #[test]
    fn test_unpause_blocked_until_grace_elapses() {
        let mut registry = EpochGatedRegistry::new();
        registry.register(addr(1), 10, GRACE).unwrap();
        registry.pause(addr(1), 20).unwrap(); // disabled from 21

        // Fails strictly before disabled_epoch + grace
        for epoch in 21..24 {
            assert!(matches!(
                registry.unpause(addr(1), epoch, GRACE).unwrap_err(),
                RegistryError::ImmutabilityWindow { .. }
            ));
        }
        // Succeeds exactly at the boundary
        registry.unpause(addr(1), 24, GRACE).unwrap();

        let entry = registry.get(addr(1)).unwrap();
        assert_eq!(entry.disabled_epoch, 0);
        // enabled_epoch untouched: pre-pause history remains queryable
        assert_eq!(entry.enabled_epoch, 11);
        assert!(registry.is_active_at(addr(1), 15));
        assert!(registry.is_active_at(addr(1), 30));
    }

    #[test]
    fn test_unpause_never_paused_entry_rejected() {
        let mut registry = EpochGatedRegistry::new();
        registry.register(addr(1), 10, GRACE).unwrap();

        assert!(matches!(
            registry.unpause(addr(1), 100, GRACE).unwrap_err(),
            RegistryError::ImmutabilityWindow { .. }
        ));
    }

    #[test]
    fn test_unregister_grace_boundary() {
        let mut registry = EpochGatedRegistry::new();
        registry.register(addr(1), 10, GRACE).unwrap();

        // Active entry cannot be unregistered at all
        assert!(matches!(
            registry.unregister(addr(1), 50, GRACE).unwrap_err(),
            RegistryError::ImmutabilityWindow { .. }
        ));

        registry.pause(addr(1), 20).unwrap(); // disabled from 21
        assert!(matches!(
            registry.unregister(addr(1), 23, GRACE).unwrap_err(),
            RegistryError::ImmutabilityWindow { .. }
        ));

        registry.unregister(addr(1), 24, GRACE).unwrap();
        assert!(!registry.contains(addr(1)));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_unregister_swaps_last_entry_into_slot() {
        let mut registry = EpochGatedRegistry::new();
        registry.register(addr(1), 10, GRACE).unwrap();
        registry.register(addr(2), 10, GRACE).unwrap();
        registry.register(addr(3), 10, GRACE).unwrap();

        registry.pause(addr(1), 20).unwrap();
        registry.unregister(addr(1), 24, GRACE).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.at(0).unwrap().address, addr(3));
        assert_eq!(registry.at(1).unwrap().address, addr(2));
        // Position index follows the swapped entry
        assert!(registry.is_active_at(addr(3), 30));
        registry.pause(addr(3), 30).unwrap();
        assert_eq!(registry.get(addr(3)).unwrap().disabled_epoch, 31);
    }

    #[test]
    fn test_register_reuses_lapsed_entry() {
        let mut registry = EpochGatedRegistry::new();
        registry.register(addr(1), 10, GRACE).unwrap();
        registry.register(addr(2), 10, GRACE).unwrap();
        registry.pause(addr(1), 20).unwrap(); // disabled from 21

        registry.register(addr(1), 24, GRACE).unwrap();

        let entry = registry.get(addr(1)).unwrap();
        assert_eq!(entry.enabled_epoch, 25);
        assert_eq!(entry.disabled_epoch, 0);
        // Stable position: reuse happens in place
        assert_eq!(registry.at(0).unwrap().address, addr(1));
        // The old active range was rewritten by the fresh registration
        assert!(!registry.is_active_at(addr(1), 24));
        assert!(registry.is_active_at(addr(1), 25));
    }

    #[test]
    fn test_active_at_preserves_registry_order() {
        let mut registry = EpochGatedRegistry::new();
        registry.register(addr(3), 10, GRACE).unwrap();
        registry.register(addr(1), 10, GRACE).unwrap();
        registry.register(addr(2), 12, GRACE).unwrap();
        registry.pause(addr(1), 30).unwrap();

        assert_eq!(registry.active_at(11), vec![addr(3), addr(1)]);
        assert_eq!(registry.active_at(13), vec![addr(3), addr(1), addr(2)]);
        assert_eq!(registry.active_at(31), vec![addr(3), addr(2)]);
        assert_eq!(registry.active_at(0), Vec::<Address>::new());
    }

    #[test]
    fn test_scheduling_saturates_at_counter_ceiling() {
        let mut registry = EpochGatedRegistry::new();
        registry.register(addr(1), Epoch::MAX, GRACE).unwrap();
        assert_eq!(registry.get(addr(1)).unwrap().enabled_epoch, Epoch::MAX);

        registry.pause(addr(1), Epoch::MAX).unwrap();
        assert_eq!(registry.get(addr(1)).unwrap().disabled_epoch, Epoch::MAX);
    }

    #[test]
    fn test_pause_is_monotonic_once_effective() {
        let mut registry = EpochGatedRegistry::new();
        registry.register(addr(1), 10, GRACE).unwrap();
        registry.pause(addr(1), 20).unwrap();

        for epoch in 21..60 {
            assert!(!registry.is_active_at(addr(1), epoch));
        }
    }
}
