//! Error types for the epoch-gated registry

use rsm_types::{Address, Epoch};
use thiserror::Error;

/// Registry errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Identity already holds an entry whose disable has not fully lapsed
    #[error("already registered: 0x{}", hex::encode(.address))]
    AlreadyRegistered { address: Address },

    /// Identity holds no entry
    #[error("not registered: 0x{}", hex::encode(.address))]
    NotRegistered { address: Address },

    /// Entry has not been inactive for the full grace period
    #[error(
        "immutability window: entry disabled at epoch {disabled_epoch} is frozen until epoch {unlock_epoch}"
    )]
    ImmutabilityWindow {
        disabled_epoch: Epoch,
        unlock_epoch: Epoch,
    },

    /// Epoch duration must be non-zero
    #[error("invalid epoch duration: must be > 0")]
    InvalidEpochDuration,
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
