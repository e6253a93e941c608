//! Vault membership operations
//!
//! Vaults are admitted either into the shared registry (collateral for every
//! operator) or into a per-operator registry. Admission validates the vault
//! against the external vault registry and enforces the slashable-margin
//! bound: the vault's epoch duration, minus its veto window when its slasher
//! is vetoable, must cover the slashing window. Otherwise a veto window plus
//! epoch granularity could outlive the period during which this middleware
//! still considers the vault's stake snapshot valid for slashing.

use super::MiddlewareService;
use crate::error::{MiddlewareError, MiddlewareResult};
use crate::ports::outbound::{
    DelegationGateway, EntityRegistry, OptInService, SlasherGateway, VaultGateway,
};
use rsm_registry::{RegistryEntry, RegistryError};
use rsm_types::{fmt_address, slasher_types, Address, Epoch};

impl<R, O, V, D, S> MiddlewareService<R, O, V, D, S>
where
    R: EntityRegistry,
    O: OptInService,
    V: VaultGateway,
    D: DelegationGateway,
    S: SlasherGateway,
{
    /// Admit a vault shared by all operators; active from the next epoch.
    pub async fn register_shared_vault(
        &self,
        caller: Address,
        vault: Address,
    ) -> MiddlewareResult<()> {
        self.ensure_authority(caller)?;
        self.validate_vault(vault).await?;

        let current_epoch = self.current_epoch();
        self.state()
            .write()
            .shared_vaults
            .register(vault, current_epoch, self.grace_epochs())?;
        tracing::info!(
            vault = %fmt_address(&vault),
            active_from = current_epoch + 1,
            "shared vault registered"
        );
        Ok(())
    }

    pub fn pause_shared_vault(&self, caller: Address, vault: Address) -> MiddlewareResult<()> {
        self.ensure_authority(caller)?;
        let current_epoch = self.current_epoch();
        self.state().write().shared_vaults.pause(vault, current_epoch)?;
        Ok(())
    }

    pub fn unpause_shared_vault(&self, caller: Address, vault: Address) -> MiddlewareResult<()> {
        self.ensure_authority(caller)?;
        let current_epoch = self.current_epoch();
        self.state()
            .write()
            .shared_vaults
            .unpause(vault, current_epoch, self.grace_epochs())?;
        Ok(())
    }

    pub fn unregister_shared_vault(&self, caller: Address, vault: Address) -> MiddlewareResult<()> {
        self.ensure_authority(caller)?;
        let current_epoch = self.current_epoch();
        self.state()
            .write()
            .shared_vaults
            .unregister(vault, current_epoch, self.grace_epochs())?;
        tracing::info!(vault = %fmt_address(&vault), "shared vault unregistered");
        Ok(())
    }

    /// Admit a vault backing a single operator; active from the next epoch.
    /// The operator must already hold an entry in the operator registry.
    pub async fn register_operator_vault(
        &self,
        caller: Address,
        operator: Address,
        vault: Address,
    ) -> MiddlewareResult<()> {
        self.ensure_authority(caller)?;
        if !self.state().read().operators.contains(operator) {
            return Err(MiddlewareError::NotOperator { address: operator });
        }
        self.validate_vault(vault).await?;

        let current_epoch = self.current_epoch();
        self.state()
            .write()
            .operator_vaults
            .entry(operator)
            .or_default()
            .register(vault, current_epoch, self.grace_epochs())?;
        tracing::info!(
            operator = %fmt_address(&operator),
            vault = %fmt_address(&vault),
            active_from = current_epoch + 1,
            "operator vault registered"
        );
        Ok(())
    }

    pub fn pause_operator_vault(
        &self,
        caller: Address,
        operator: Address,
        vault: Address,
    ) -> MiddlewareResult<()> {
        self.ensure_authority(caller)?;
        let current_epoch = self.current_epoch();
        let mut state = self.state().write();
        let registry = state
            .operator_vaults
            .get_mut(&operator)
            .ok_or(RegistryError::NotRegistered { address: vault })?;
        registry.pause(vault, current_epoch)?;
        Ok(())
    }

    pub fn unpause_operator_vault(
        &self,
        caller: Address,
        operator: Address,
        vault: Address,
    ) -> MiddlewareResult<()> {
        self.ensure_authority(caller)?;
        let current_epoch = self.current_epoch();
        let mut state = self.state().write();
        let registry = state
            .operator_vaults
            .get_mut(&operator)
            .ok_or(RegistryError::NotRegistered { address: vault })?;
        registry.unpause(vault, current_epoch, self.grace_epochs())?;
        Ok(())
    }

    pub fn unregister_operator_vault(
        &self,
        caller: Address,
        operator: Address,
        vault: Address,
    ) -> MiddlewareResult<()> {
        self.ensure_authority(caller)?;
        let current_epoch = self.current_epoch();
        let mut state = self.state().write();
        let registry = state
            .operator_vaults
            .get_mut(&operator)
            .ok_or(RegistryError::NotRegistered { address: vault })?;
        registry.unregister(vault, current_epoch, self.grace_epochs())?;
        Ok(())
    }

    pub fn shared_vault_count(&self) -> usize {
        self.state().read().shared_vaults.len()
    }

    pub fn shared_vault_at(&self, position: usize) -> Option<RegistryEntry> {
        self.state().read().shared_vaults.at(position).copied()
    }

    pub fn is_shared_vault_active_at(&self, vault: Address, epoch: Epoch) -> bool {
        self.state().read().shared_vaults.is_active_at(vault, epoch)
    }

    pub fn operator_vault_count(&self, operator: Address) -> usize {
        self.state()
            .read()
            .operator_vaults
            .get(&operator)
            .map(|registry| registry.len())
            .unwrap_or(0)
    }

    pub fn operator_vault_at(&self, operator: Address, position: usize) -> Option<RegistryEntry> {
        self.state()
            .read()
            .operator_vaults
            .get(&operator)
            .and_then(|registry| registry.at(position))
            .copied()
    }

    pub fn is_operator_vault_active_at(
        &self,
        operator: Address,
        vault: Address,
        epoch: Epoch,
    ) -> bool {
        self.state()
            .read()
            .operator_vaults
            .get(&operator)
            .map(|registry| registry.is_active_at(vault, epoch))
            .unwrap_or(false)
    }

    /// Every vault backing `operator` at the current epoch.
    pub fn active_vaults(&self, operator: Address) -> Vec<Address> {
        self.active_vaults_at(self.current_epoch(), operator)
    }

    /// Every vault backing `operator` at `epoch`: active shared vaults
    /// first, active operator-specific vaults second.
    ///
    /// Not de-duplicated. A vault registered both ways contributes twice to
    /// stake and power; avoiding double registration is the caller's
    /// responsibility.
    pub fn active_vaults_at(&self, epoch: Epoch, operator: Address) -> Vec<Address> {
        let state = self.state().read();
        let mut vaults = state.shared_vaults.active_at(epoch);
        if let Some(registry) = state.operator_vaults.get(&operator) {
            vaults.extend(registry.active_at(epoch));
        }
        vaults
    }

    /// Shared admission validation for both vault kinds.
    pub(crate) async fn validate_vault(&self, vault: Address) -> MiddlewareResult<()> {
        if !self.vault_registry.is_entity(vault).await? {
            return Err(MiddlewareError::NotVault { address: vault });
        }
        if !self.vaults.is_initialized(vault).await? {
            return Err(MiddlewareError::VaultNotInitialized { vault });
        }

        let vault_epoch = self.vaults.epoch_duration(vault).await?;
        let veto_duration = match self.vaults.slasher(vault).await? {
            Some(slasher)
                if self.slashers.slasher_type(slasher).await? == slasher_types::VETO =>
            {
                self.slashers.veto_duration(slasher).await?
            }
            _ => 0,
        };

        let available = vault_epoch.saturating_sub(veto_duration);
        let required = self.config().slashing_window;
        if available < required {
            return Err(MiddlewareError::VaultEpochTooShort {
                vault,
                available,
                required,
            });
        }
        Ok(())
    }
}
