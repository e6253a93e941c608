//! Middleware service - membership orchestration, exposure accounting, and
//! slash routing over epoch-gated registries.
//!
//! The service exclusively owns all registries; collaborators are reached
//! through the outbound ports and never mutate membership. Locks are never
//! held across external calls: admission checks and external queries run
//! first, registry mutation commits last, so a failed call leaves no partial
//! state.

mod operators;
mod slash;
mod stake;
mod vaults;

use crate::config::MiddlewareConfig;
use crate::error::{MiddlewareError, MiddlewareResult};
use crate::ports::inbound::{MiddlewareApi, SlashResponse};
use crate::ports::outbound::{
    DelegationGateway, EntityRegistry, IdentityPower, OptInService, SlasherGateway, StakeToPower,
    VaultGateway,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use rsm_registry::{EpochClock, EpochGatedRegistry, RegistryEntry, SystemTimeSource, TimeSource};
use rsm_types::{Address, Amount, Epoch, Subnetwork, Timestamp};
use std::collections::HashMap;
use std::sync::Arc;

/// Membership registries, owned exclusively by the service.
#[derive(Default)]
pub(crate) struct MembershipState {
    pub(crate) operators: EpochGatedRegistry,
    pub(crate) shared_vaults: EpochGatedRegistry,
    pub(crate) operator_vaults: HashMap<Address, EpochGatedRegistry>,
}

/// Middleware service.
///
/// Generic over the outbound collaborator ports; the stake-to-power
/// conversion and timestamp capture are injected strategies.
pub struct MiddlewareService<R, O, V, D, S>
where
    R: EntityRegistry,
    O: OptInService,
    V: VaultGateway,
    D: DelegationGateway,
    S: SlasherGateway,
{
    config: MiddlewareConfig,
    clock: EpochClock,
    /// Grace period in epochs, derived from the slashing window (rounded up
    /// so the grace period is never shorter than the window).
    grace_epochs: u64,
    time: Arc<dyn TimeSource>,
    power: Arc<dyn StakeToPower>,
    state: Arc<RwLock<MembershipState>>,
    operator_registry: Arc<R>,
    vault_registry: Arc<R>,
    opt_in: Arc<O>,
    vaults: Arc<V>,
    delegation: Arc<D>,
    slashers: Arc<S>,
}

impl<R, O, V, D, S> MiddlewareService<R, O, V, D, S>
where
    R: EntityRegistry,
    O: OptInService,
    V: VaultGateway,
    D: DelegationGateway,
    S: SlasherGateway,
{
    /// Create a service with the system clock and the identity power
    /// conversion. Fails if the configured epoch duration is 0.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: MiddlewareConfig,
        operator_registry: Arc<R>,
        vault_registry: Arc<R>,
        opt_in: Arc<O>,
        vaults: Arc<V>,
        delegation: Arc<D>,
        slashers: Arc<S>,
    ) -> MiddlewareResult<Self> {
        let clock = EpochClock::new(config.epoch_origin, config.epoch_duration)?;
        let grace_epochs = config.slashing_window.div_ceil(config.epoch_duration);
        Ok(Self {
            config,
            clock,
            grace_epochs,
            time: Arc::new(SystemTimeSource),
            power: Arc::new(IdentityPower),
            state: Arc::new(RwLock::new(MembershipState::default())),
            operator_registry,
            vault_registry,
            opt_in,
            vaults,
            delegation,
            slashers,
        })
    }

    /// Substitute the timestamp source (deterministic replay, tests).
    pub fn with_time_source(mut self, time: Arc<dyn TimeSource>) -> Self {
        self.time = time;
        self
    }

    /// Substitute the stake-to-power conversion.
    pub fn with_stake_to_power(mut self, power: Arc<dyn StakeToPower>) -> Self {
        self.power = power;
        self
    }

    pub fn config(&self) -> &MiddlewareConfig {
        &self.config
    }

    pub fn clock(&self) -> &EpochClock {
        &self.clock
    }

    /// Grace period applied to all registries, in epochs.
    pub fn grace_epochs(&self) -> u64 {
        self.grace_epochs
    }

    pub fn current_epoch(&self) -> Epoch {
        self.clock.epoch_at(self.time.now())
    }

    pub fn epoch_start(&self, epoch: Epoch) -> Timestamp {
        self.clock.epoch_start(epoch)
    }

    pub(crate) fn now(&self) -> Timestamp {
        self.time.now()
    }

    pub(crate) fn state(&self) -> &RwLock<MembershipState> {
        &self.state
    }

    pub(crate) fn ensure_authority(&self, caller: Address) -> MiddlewareResult<()> {
        if caller != self.config.authority {
            return Err(MiddlewareError::Unauthorized { caller });
        }
        Ok(())
    }
}

#[async_trait]
impl<R, O, V, D, S> MiddlewareApi for MiddlewareService<R, O, V, D, S>
where
    R: EntityRegistry,
    O: OptInService,
    V: VaultGateway,
    D: DelegationGateway,
    S: SlasherGateway,
{
    async fn current_epoch(&self) -> Epoch {
        MiddlewareService::current_epoch(self)
    }

    async fn epoch_start(&self, epoch: Epoch) -> Timestamp {
        MiddlewareService::epoch_start(self, epoch)
    }

    async fn register_operator(
        &self,
        caller: Address,
        operator: Address,
    ) -> MiddlewareResult<()> {
        MiddlewareService::register_operator(self, caller, operator).await
    }

    async fn pause_operator(&self, caller: Address, operator: Address) -> MiddlewareResult<()> {
        MiddlewareService::pause_operator(self, caller, operator)
    }

    async fn unpause_operator(&self, caller: Address, operator: Address) -> MiddlewareResult<()> {
        MiddlewareService::unpause_operator(self, caller, operator)
    }

    async fn unregister_operator(
        &self,
        caller: Address,
        operator: Address,
    ) -> MiddlewareResult<()> {
        MiddlewareService::unregister_operator(self, caller, operator)
    }

    async fn register_shared_vault(
        &self,
        caller: Address,
        vault: Address,
    ) -> MiddlewareResult<()> {
        MiddlewareService::register_shared_vault(self, caller, vault).await
    }

    async fn pause_shared_vault(&self, caller: Address, vault: Address) -> MiddlewareResult<()> {
        MiddlewareService::pause_shared_vault(self, caller, vault)
    }

    async fn unpause_shared_vault(&self, caller: Address, vault: Address) -> MiddlewareResult<()> {
        MiddlewareService::unpause_shared_vault(self, caller, vault)
    }

    async fn unregister_shared_vault(
        &self,
        caller: Address,
        vault: Address,
    ) -> MiddlewareResult<()> {
        MiddlewareService::unregister_shared_vault(self, caller, vault)
    }

    async fn register_operator_vault(
        &self,
        caller: Address,
        operator: Address,
        vault: Address,
    ) -> MiddlewareResult<()> {
        MiddlewareService::register_operator_vault(self, caller, operator, vault).await
    }

    async fn pause_operator_vault(
        &self,
        caller: Address,
        operator: Address,
        vault: Address,
    ) -> MiddlewareResult<()> {
        MiddlewareService::pause_operator_vault(self, caller, operator, vault)
    }

    async fn unpause_operator_vault(
        &self,
        caller: Address,
        operator: Address,
        vault: Address,
    ) -> MiddlewareResult<()> {
        MiddlewareService::unpause_operator_vault(self, caller, operator, vault)
    }

    async fn unregister_operator_vault(
        &self,
        caller: Address,
        operator: Address,
        vault: Address,
    ) -> MiddlewareResult<()> {
        MiddlewareService::unregister_operator_vault(self, caller, operator, vault)
    }

    async fn operator_count(&self) -> usize {
        MiddlewareService::operator_count(self)
    }

    async fn operator_at(&self, position: usize) -> Option<RegistryEntry> {
        MiddlewareService::operator_at(self, position)
    }

    async fn is_operator_active_at(&self, operator: Address, epoch: Epoch) -> bool {
        MiddlewareService::is_operator_active_at(self, operator, epoch)
    }

    async fn active_operators(&self) -> Vec<Address> {
        MiddlewareService::active_operators(self)
    }

    async fn active_operators_at(&self, epoch: Epoch) -> Vec<Address> {
        MiddlewareService::active_operators_at(self, epoch)
    }

    async fn shared_vault_count(&self) -> usize {
        MiddlewareService::shared_vault_count(self)
    }

    async fn shared_vault_at(&self, position: usize) -> Option<RegistryEntry> {
        MiddlewareService::shared_vault_at(self, position)
    }

    async fn is_shared_vault_active_at(&self, vault: Address, epoch: Epoch) -> bool {
        MiddlewareService::is_shared_vault_active_at(self, vault, epoch)
    }

    async fn operator_vault_count(&self, operator: Address) -> usize {
        MiddlewareService::operator_vault_count(self, operator)
    }

    async fn operator_vault_at(
        &self,
        operator: Address,
        position: usize,
    ) -> Option<RegistryEntry> {
        MiddlewareService::operator_vault_at(self, operator, position)
    }

    async fn is_operator_vault_active_at(
        &self,
        operator: Address,
        vault: Address,
        epoch: Epoch,
    ) -> bool {
        MiddlewareService::is_operator_vault_active_at(self, operator, vault, epoch)
    }

    async fn active_vaults(&self, operator: Address) -> Vec<Address> {
        MiddlewareService::active_vaults(self, operator)
    }

    async fn active_vaults_at(&self, epoch: Epoch, operator: Address) -> Vec<Address> {
        MiddlewareService::active_vaults_at(self, epoch, operator)
    }

    async fn operator_stake(&self, epoch: Epoch, operator: Address) -> MiddlewareResult<Amount> {
        MiddlewareService::operator_stake(self, epoch, operator).await
    }

    async fn operator_power(&self, epoch: Epoch, operator: Address) -> MiddlewareResult<Amount> {
        MiddlewareService::operator_power(self, epoch, operator).await
    }

    async fn total_stake(&self, epoch: Epoch, operators: &[Address]) -> MiddlewareResult<Amount> {
        MiddlewareService::total_stake(self, epoch, operators).await
    }

    async fn slash(
        &self,
        caller: Address,
        epoch: Epoch,
        vault: Address,
        subnetwork: Subnetwork,
        operator: Address,
        amount: Amount,
        hints: &[u8],
    ) -> MiddlewareResult<SlashResponse> {
        MiddlewareService::slash(self, caller, epoch, vault, subnetwork, operator, amount, hints)
            .await
    }

    async fn execute_slash(
        &self,
        caller: Address,
        vault: Address,
        operator: Address,
        request_index: u64,
        hints: &[u8],
    ) -> MiddlewareResult<Amount> {
        MiddlewareService::execute_slash(self, caller, vault, operator, request_index, hints).await
    }
}
