//! Slash routing
//!
//! Dispatches a slash request to the vault's configured enforcement
//! mechanism. Instant slashers resolve synchronously; vetoable slashers
//! return a pending-request index whose second phase is forwarded through
//! [`MiddlewareService::execute_slash`]. Veto-window and veto-decision rules
//! live in the external slasher, not here.

use super::MiddlewareService;
use crate::error::{MiddlewareError, MiddlewareResult};
use crate::ports::inbound::SlashResponse;
use crate::ports::outbound::{
    DelegationGateway, EntityRegistry, OptInService, SlasherGateway, VaultGateway,
};
use rsm_types::{fmt_address, slasher_types, Address, Amount, Epoch, Subnetwork};

impl<R, O, V, D, S> MiddlewareService<R, O, V, D, S>
where
    R: EntityRegistry,
    O: OptInService,
    V: VaultGateway,
    D: DelegationGateway,
    S: SlasherGateway,
{
    /// Route a slash request against `vault` for stake captured at `epoch`.
    ///
    /// The capture timestamp is the epoch's start, matching the timestamps
    /// used by exposure aggregation. An instant slasher may clamp the amount
    /// below the requested value; that is accepted, not an error.
    #[allow(clippy::too_many_arguments)]
    pub async fn slash(
        &self,
        caller: Address,
        epoch: Epoch,
        vault: Address,
        subnetwork: Subnetwork,
        operator: Address,
        amount: Amount,
        hints: &[u8],
    ) -> MiddlewareResult<SlashResponse> {
        self.ensure_authority(caller)?;
        if !self.state().read().shared_vaults.contains(vault) {
            return Err(MiddlewareError::NotVault { address: vault });
        }

        let capture_timestamp = self.epoch_start(epoch);
        let slasher = self
            .vaults
            .slasher(vault)
            .await?
            .ok_or(MiddlewareError::NoSlasher { vault })?;
        let slasher_type = self.slashers.slasher_type(slasher).await?;

        let response = match slasher_type {
            slasher_types::INSTANT => {
                let slashed = self
                    .slashers
                    .slash(slasher, subnetwork, operator, amount, capture_timestamp, hints)
                    .await?;
                tracing::warn!(
                    vault = %fmt_address(&vault),
                    operator = %fmt_address(&operator),
                    requested = amount,
                    slashed,
                    "instant slash executed"
                );
                slashed
            }
            slasher_types::VETO => {
                let request_index = self
                    .slashers
                    .request_slash(slasher, subnetwork, operator, amount, capture_timestamp, hints)
                    .await?;
                tracing::warn!(
                    vault = %fmt_address(&vault),
                    operator = %fmt_address(&operator),
                    requested = amount,
                    request_index,
                    "veto slash requested"
                );
                u128::from(request_index)
            }
            type_tag => {
                return Err(MiddlewareError::UnknownSlasherType { vault, type_tag });
            }
        };

        Ok(SlashResponse {
            vault,
            slasher_type,
            subnetwork,
            response,
        })
    }

    /// Second phase of a vetoable slash.
    ///
    /// The vault must be registered (shared or operator-specific) for
    /// `operator`, and its slasher must be vetoable. Whether the veto window
    /// elapsed and whether the request was vetoed is enforced by the
    /// external slasher.
    pub async fn execute_slash(
        &self,
        caller: Address,
        vault: Address,
        operator: Address,
        request_index: u64,
        hints: &[u8],
    ) -> MiddlewareResult<Amount> {
        self.ensure_authority(caller)?;
        let known = {
            let state = self.state().read();
            state.shared_vaults.contains(vault)
                || state
                    .operator_vaults
                    .get(&operator)
                    .map(|registry| registry.contains(vault))
                    .unwrap_or(false)
        };
        if !known {
            return Err(MiddlewareError::NotVault { address: vault });
        }

        let slasher = self
            .vaults
            .slasher(vault)
            .await?
            .ok_or(MiddlewareError::NoSlasher { vault })?;
        if self.slashers.slasher_type(slasher).await? != slasher_types::VETO {
            return Err(MiddlewareError::NonVetoSlasher { vault });
        }

        let slashed = self
            .slashers
            .execute_slash(slasher, request_index, hints)
            .await?;
        tracing::warn!(
            vault = %fmt_address(&vault),
            operator = %fmt_address(&operator),
            request_index,
            slashed,
            "veto slash executed"
        );
        Ok(slashed)
    }
}
