//! Driving Ports (API - Inbound)
//!
//! The surface this core exposes to its host: enumeration and historical
//! membership queries, exposure accounting, and the restricted
//! administrative operations.

use crate::error::MiddlewareResult;
use async_trait::async_trait;
use rsm_registry::RegistryEntry;
use rsm_types::{Address, Amount, Epoch, Subnetwork, Timestamp};
use serde::{Deserialize, Serialize};

/// Outcome of a dispatched slash request.
///
/// `response` is type-dependent: the amount actually removed for instant
/// slashers, an opaque pending-request index for vetoable slashers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashResponse {
    pub vault: Address,
    pub slasher_type: u64,
    pub subnetwork: Subnetwork,
    pub response: u128,
}

/// Primary middleware API.
///
/// Administrative operations take the caller identity and are restricted to
/// the configured authority; queries are open.
#[async_trait]
pub trait MiddlewareApi: Send + Sync {
    // --- epoch clock ---

    /// Current epoch of this middleware's clock.
    async fn current_epoch(&self) -> Epoch;

    /// Start timestamp of epoch `epoch`.
    async fn epoch_start(&self, epoch: Epoch) -> Timestamp;

    // --- operator membership (administrative) ---

    async fn register_operator(&self, caller: Address, operator: Address)
        -> MiddlewareResult<()>;
    async fn pause_operator(&self, caller: Address, operator: Address) -> MiddlewareResult<()>;
    async fn unpause_operator(&self, caller: Address, operator: Address) -> MiddlewareResult<()>;
    async fn unregister_operator(
        &self,
        caller: Address,
        operator: Address,
    ) -> MiddlewareResult<()>;

    // --- vault membership (administrative) ---

    async fn register_shared_vault(&self, caller: Address, vault: Address)
        -> MiddlewareResult<()>;
    async fn pause_shared_vault(&self, caller: Address, vault: Address) -> MiddlewareResult<()>;
    async fn unpause_shared_vault(&self, caller: Address, vault: Address) -> MiddlewareResult<()>;
    async fn unregister_shared_vault(
        &self,
        caller: Address,
        vault: Address,
    ) -> MiddlewareResult<()>;

    async fn register_operator_vault(
        &self,
        caller: Address,
        operator: Address,
        vault: Address,
    ) -> MiddlewareResult<()>;
    async fn pause_operator_vault(
        &self,
        caller: Address,
        operator: Address,
        vault: Address,
    ) -> MiddlewareResult<()>;
    async fn unpause_operator_vault(
        &self,
        caller: Address,
        operator: Address,
        vault: Address,
    ) -> MiddlewareResult<()>;
    async fn unregister_operator_vault(
        &self,
        caller: Address,
        operator: Address,
        vault: Address,
    ) -> MiddlewareResult<()>;

    // --- enumeration and historical queries ---

    async fn operator_count(&self) -> usize;
    async fn operator_at(&self, position: usize) -> Option<RegistryEntry>;
    async fn is_operator_active_at(&self, operator: Address, epoch: Epoch) -> bool;
    async fn active_operators(&self) -> Vec<Address>;
    async fn active_operators_at(&self, epoch: Epoch) -> Vec<Address>;

    async fn shared_vault_count(&self) -> usize;
    async fn shared_vault_at(&self, position: usize) -> Option<RegistryEntry>;
    async fn is_shared_vault_active_at(&self, vault: Address, epoch: Epoch) -> bool;

    async fn operator_vault_count(&self, operator: Address) -> usize;
    async fn operator_vault_at(&self, operator: Address, position: usize)
        -> Option<RegistryEntry>;
    async fn is_operator_vault_active_at(
        &self,
        operator: Address,
        vault: Address,
        epoch: Epoch,
    ) -> bool;

    /// Active shared vaults followed by active operator-specific vaults at
    /// the current epoch. Not de-duplicated.
    async fn active_vaults(&self, operator: Address) -> Vec<Address>;
    async fn active_vaults_at(&self, epoch: Epoch, operator: Address) -> Vec<Address>;

    // --- exposure accounting ---

    async fn operator_stake(&self, epoch: Epoch, operator: Address) -> MiddlewareResult<Amount>;
    async fn operator_power(&self, epoch: Epoch, operator: Address) -> MiddlewareResult<Amount>;
    async fn total_stake(&self, epoch: Epoch, operators: &[Address]) -> MiddlewareResult<Amount>;

    // --- slashing (administrative) ---

    async fn slash(
        &self,
        caller: Address,
        epoch: Epoch,
        vault: Address,
        subnetwork: Subnetwork,
        operator: Address,
        amount: Amount,
        hints: &[u8],
    ) -> MiddlewareResult<SlashResponse>;

    async fn execute_slash(
        &self,
        caller: Address,
        vault: Address,
        operator: Address,
        request_index: u64,
        hints: &[u8],
    ) -> MiddlewareResult<Amount>;
}
