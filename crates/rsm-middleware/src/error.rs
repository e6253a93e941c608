//! Error types for the middleware core
//!
//! Three families, all rejected before any state mutation:
//!
//! - validation (unknown identity, not opted in, vault epoch too short,
//!   duplicate registration)
//! - temporal policy (epoch too old, epoch in the future, immutability
//!   window not yet elapsed)
//! - protocol mismatch (unknown slasher type, non-veto slasher used for a
//!   second-phase execute)
//!
//! Every operation is atomic: a failed call leaves no partial registry
//! mutation, and there is no retry anywhere in this core.

use rsm_registry::RegistryError;
use rsm_types::{Address, DurationSecs, Epoch};
use thiserror::Error;

/// Middleware errors
#[derive(Debug, Error)]
pub enum MiddlewareError {
    /// Candidate is not a recognized operator entity
    #[error("not an operator: 0x{}", hex::encode(.address))]
    NotOperator { address: Address },

    /// Operator has not opted in to this network
    #[error("operator not opted in: 0x{}", hex::encode(.operator))]
    NotOptedIn { operator: Address },

    /// Address is not a recognized/registered vault
    #[error("not a vault: 0x{}", hex::encode(.address))]
    NotVault { address: Address },

    /// Vault reports itself uninitialized
    #[error("vault not initialized: 0x{}", hex::encode(.vault))]
    VaultNotInitialized { vault: Address },

    /// Vault epoch minus veto window is shorter than the slashing window
    #[error(
        "vault epoch too short: 0x{} leaves {available}s of slashable margin, need {required}s",
        hex::encode(.vault)
    )]
    VaultEpochTooShort {
        vault: Address,
        available: DurationSecs,
        required: DurationSecs,
    },

    /// Epoch start lies more than a slashing window in the past
    #[error("epoch {epoch} is older than the slashing window")]
    TooOldEpoch { epoch: Epoch },

    /// Epoch refers to the future
    #[error("epoch {epoch} has not started yet")]
    InvalidEpoch { epoch: Epoch },

    /// Slasher reports a type tag this core does not understand
    #[error("unknown slasher type {type_tag} on vault 0x{}", hex::encode(.vault))]
    UnknownSlasherType { vault: Address, type_tag: u64 },

    /// Second-phase execute on a vault whose slasher is not vetoable
    #[error("vault 0x{} does not use a veto slasher", hex::encode(.vault))]
    NonVetoSlasher { vault: Address },

    /// Vault has no slasher configured at all
    #[error("vault 0x{} has no slasher", hex::encode(.vault))]
    NoSlasher { vault: Address },

    /// Caller is not the administrative authority
    #[error("unauthorized caller: 0x{}", hex::encode(.caller))]
    Unauthorized { caller: Address },

    /// Membership registry rejection
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// External collaborator call failed; the whole operation aborts
    #[error("external call failed: {reason}")]
    External { reason: String },
}

/// Result type for middleware operations
pub type MiddlewareResult<T> = Result<T, MiddlewareError>;
