//! Exposure aggregation
//!
//! Stake and power are summed over the cross product of an operator's
//! active vaults and the network's active subnetworks, always as of the
//! epoch's start timestamp so results are replayable. External queries are
//! authoritative: the first failure aborts the whole aggregation, no partial
//! sums are returned.

use super::MiddlewareService;
use crate::error::{MiddlewareError, MiddlewareResult};
use crate::ports::outbound::{
    DelegationGateway, EntityRegistry, OptInService, SlasherGateway, VaultGateway,
};
use rsm_types::{Address, Amount, Epoch};

impl<R, O, V, D, S> MiddlewareService<R, O, V, D, S>
where
    R: EntityRegistry,
    O: OptInService,
    V: VaultGateway,
    D: DelegationGateway,
    S: SlasherGateway,
{
    /// Total stake delegated to `operator` across its active vaults and all
    /// active subnetworks at `epoch`.
    pub async fn operator_stake(&self, epoch: Epoch, operator: Address) -> MiddlewareResult<Amount> {
        self.fold_exposure(epoch, operator, false).await
    }

    /// Like [`operator_stake`](Self::operator_stake), with each per-vault
    /// stake value folded through the injected stake-to-power conversion
    /// before summation.
    pub async fn operator_power(&self, epoch: Epoch, operator: Address) -> MiddlewareResult<Amount> {
        self.fold_exposure(epoch, operator, true).await
    }

    /// Sum of operator stakes over `operators` at `epoch`.
    ///
    /// Fails with `TooOldEpoch` when the epoch's start lies more than a
    /// slashing window in the past (the system is no longer obligated to
    /// honor that exposure window) and with `InvalidEpoch` when the epoch
    /// has not started yet.
    pub async fn total_stake(
        &self,
        epoch: Epoch,
        operators: &[Address],
    ) -> MiddlewareResult<Amount> {
        let now = self.now();
        if self.epoch_start(epoch) < now.saturating_sub(self.config().slashing_window) {
            return Err(MiddlewareError::TooOldEpoch { epoch });
        }
        if epoch > self.current_epoch() {
            return Err(MiddlewareError::InvalidEpoch { epoch });
        }

        let mut total: Amount = 0;
        for &operator in operators {
            total = total.saturating_add(self.operator_stake(epoch, operator).await?);
        }
        Ok(total)
    }

    async fn fold_exposure(
        &self,
        epoch: Epoch,
        operator: Address,
        to_power: bool,
    ) -> MiddlewareResult<Amount> {
        let timestamp = self.epoch_start(epoch);
        let vaults = self.active_vaults_at(epoch, operator);
        let subnetworks = self.config().subnetwork_set();

        let mut total: Amount = 0;
        for vault in vaults {
            let delegator = self.vaults.delegator(vault).await?;
            for &subnetwork in &subnetworks {
                let stake = self
                    .delegation
                    .stake_at(delegator, subnetwork, operator, timestamp, &[])
                    .await?;
                let value = if to_power {
                    self.power.power(vault, stake)
                } else {
                    stake
                };
                total = total.saturating_add(value);
            }
        }
        Ok(total)
    }
}
