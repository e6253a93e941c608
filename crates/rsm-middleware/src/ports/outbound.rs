//! Driven Ports (SPI - Outbound Dependencies)
//!
//! Collaborator interfaces the core consumes. Every call is synchronous from
//! the core's point of view: it either returns a value or aborts the entire
//! enclosing operation. No retries, no partial sums.

use crate::error::MiddlewareResult;
use async_trait::async_trait;
use rsm_types::{Address, Amount, DurationSecs, Subnetwork, Timestamp};

/// External entity registry used to validate candidate identities.
///
/// The middleware holds two instances: one recognizing operators, one
/// recognizing vaults.
#[async_trait]
pub trait EntityRegistry: Send + Sync {
    async fn is_entity(&self, address: Address) -> MiddlewareResult<bool>;
}

/// External opt-in service recording which operators joined which network.
#[async_trait]
pub trait OptInService: Send + Sync {
    async fn is_opted_in(&self, operator: Address, network: Address) -> MiddlewareResult<bool>;
}

/// Vault metadata queries.
#[async_trait]
pub trait VaultGateway: Send + Sync {
    async fn is_initialized(&self, vault: Address) -> MiddlewareResult<bool>;

    /// The vault's own epoch duration; bounds how long its stake snapshots
    /// stay slashable.
    async fn epoch_duration(&self, vault: Address) -> MiddlewareResult<DurationSecs>;

    /// Configured slasher, if any.
    async fn slasher(&self, vault: Address) -> MiddlewareResult<Option<Address>>;

    /// The vault's delegation layer.
    async fn delegator(&self, vault: Address) -> MiddlewareResult<Address>;
}

/// Delegation-layer stake queries.
#[async_trait]
pub trait DelegationGateway: Send + Sync {
    /// Stake held by `operator` in `subnetwork` as of `timestamp`.
    ///
    /// The aggregator always passes an epoch's start timestamp, never "now",
    /// so results are stable regardless of when the query executes.
    async fn stake_at(
        &self,
        delegator: Address,
        subnetwork: Subnetwork,
        operator: Address,
        timestamp: Timestamp,
        hints: &[u8],
    ) -> MiddlewareResult<Amount>;
}

/// Slasher queries and penalty invocations.
#[async_trait]
pub trait SlasherGateway: Send + Sync {
    /// Stable type tag (see `rsm_types::slasher_types`).
    async fn slasher_type(&self, slasher: Address) -> MiddlewareResult<u64>;

    /// Veto window length; only meaningful for veto-type slashers.
    async fn veto_duration(&self, slasher: Address) -> MiddlewareResult<DurationSecs>;

    /// Instant slash. Returns the amount actually removed, which the slasher
    /// may clamp below the requested amount.
    async fn slash(
        &self,
        slasher: Address,
        subnetwork: Subnetwork,
        operator: Address,
        amount: Amount,
        capture_timestamp: Timestamp,
        hints: &[u8],
    ) -> MiddlewareResult<Amount>;

    /// First phase of a vetoable slash. Returns an opaque request index.
    async fn request_slash(
        &self,
        slasher: Address,
        subnetwork: Subnetwork,
        operator: Address,
        amount: Amount,
        capture_timestamp: Timestamp,
        hints: &[u8],
    ) -> MiddlewareResult<u64>;

    /// Second phase of a vetoable slash. The slasher itself enforces that
    /// the veto window elapsed and the request was not vetoed.
    async fn execute_slash(
        &self,
        slasher: Address,
        request_index: u64,
        hints: &[u8],
    ) -> MiddlewareResult<Amount>;
}

/// Stake-to-power conversion strategy injected into the exposure aggregator.
///
/// Lets deployments weight vaults unequally (e.g. by collateral risk)
/// without touching aggregation logic.
pub trait StakeToPower: Send + Sync {
    fn power(&self, vault: Address, stake: Amount) -> Amount;
}

/// Default conversion: power equals stake.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityPower;

impl StakeToPower for IdentityPower {
    fn power(&self, _vault: Address, stake: Amount) -> Amount {
        stake
    }
}
