//! Operator membership operations
//!
//! Admission requires the candidate to be a recognized entity in the
//! external operator registry and to have opted in to this network; the
//! epoch-gated registry handles everything else.

use super::MiddlewareService;
use crate::error::{MiddlewareError, MiddlewareResult};
use crate::ports::outbound::{
    DelegationGateway, EntityRegistry, OptInService, SlasherGateway, VaultGateway,
};
use rsm_registry::RegistryEntry;
use rsm_types::{fmt_address, Address, Epoch};

impl<R, O, V, D, S> MiddlewareService<R, O, V, D, S>
where
    R: EntityRegistry,
    O: OptInService,
    V: VaultGateway,
    D: DelegationGateway,
    S: SlasherGateway,
{
    /// Admit an operator; active from the next epoch.
    pub async fn register_operator(
        &self,
        caller: Address,
        operator: Address,
    ) -> MiddlewareResult<()> {
        self.ensure_authority(caller)?;
        if !self.operator_registry.is_entity(operator).await? {
            return Err(MiddlewareError::NotOperator { address: operator });
        }
        if !self.opt_in.is_opted_in(operator, self.config().network).await? {
            return Err(MiddlewareError::NotOptedIn { operator });
        }

        let current_epoch = self.current_epoch();
        self.state()
            .write()
            .operators
            .register(operator, current_epoch, self.grace_epochs())?;
        tracing::info!(
            operator = %fmt_address(&operator),
            active_from = current_epoch + 1,
            "operator registered"
        );
        Ok(())
    }

    /// Schedule operator deactivation from the next epoch.
    pub fn pause_operator(&self, caller: Address, operator: Address) -> MiddlewareResult<()> {
        self.ensure_authority(caller)?;
        let current_epoch = self.current_epoch();
        self.state().write().operators.pause(operator, current_epoch)?;
        tracing::info!(
            operator = %fmt_address(&operator),
            inactive_from = current_epoch + 1,
            "operator paused"
        );
        Ok(())
    }

    /// Reactivate a paused operator once the grace period has elapsed.
    pub fn unpause_operator(&self, caller: Address, operator: Address) -> MiddlewareResult<()> {
        self.ensure_authority(caller)?;
        let current_epoch = self.current_epoch();
        self.state()
            .write()
            .operators
            .unpause(operator, current_epoch, self.grace_epochs())?;
        Ok(())
    }

    /// Permanently remove an operator once the grace period has elapsed.
    pub fn unregister_operator(&self, caller: Address, operator: Address) -> MiddlewareResult<()> {
        self.ensure_authority(caller)?;
        let current_epoch = self.current_epoch();
        self.state()
            .write()
            .operators
            .unregister(operator, current_epoch, self.grace_epochs())?;
        tracing::info!(operator = %fmt_address(&operator), "operator unregistered");
        Ok(())
    }

    pub fn operator_count(&self) -> usize {
        self.state().read().operators.len()
    }

    pub fn operator_at(&self, position: usize) -> Option<RegistryEntry> {
        self.state().read().operators.at(position).copied()
    }

    /// Historical membership predicate, usable as slashing evidence.
    pub fn is_operator_active_at(&self, operator: Address, epoch: Epoch) -> bool {
        self.state().read().operators.is_active_at(operator, epoch)
    }

    pub fn active_operators(&self) -> Vec<Address> {
        self.active_operators_at(self.current_epoch())
    }

    pub fn active_operators_at(&self, epoch: Epoch) -> Vec<Address> {
        self.state().read().operators.active_at(epoch)
    }
}
