//! # Core Domain Entities
//!
//! Defines the primitive types every middleware crate speaks in.
//!
//! ## Clusters
//!
//! - **Identity**: `Address`, `Subnetwork`
//! - **Time**: `Epoch`, `Timestamp`, `DurationSecs`
//! - **Economics**: `Amount`
//! - **External calls**: slasher type tags

use serde::{Deserialize, Serialize};

/// A 20-byte Ethereum-style address.
///
/// All identity fields (operators, vaults, slashers, delegators) use [u8; 20].
pub type Address = [u8; 20];

/// Monotonic epoch counter. Epoch boundaries are the only moments at which
/// membership changes take effect.
pub type Epoch = u64;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// A duration in seconds (epoch length, veto window, slashing window).
pub type DurationSecs = u64;

/// A stake or power amount.
pub type Amount = u128;

/// Render an address as `0x`-prefixed hex for logs and errors.
pub fn fmt_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// A subnetwork identifier: a network address plus a local index partitioning
/// stake and delegation within that network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subnetwork {
    pub network: Address,
    pub identifier: u64,
}

impl Subnetwork {
    pub fn new(network: Address, identifier: u64) -> Self {
        Self {
            network,
            identifier,
        }
    }
}

/// Stable type tags reported by a slasher's entity-type discriminator.
pub mod slasher_types {
    /// Synchronous, final slashing.
    pub const INSTANT: u64 = 0;
    /// Two-phase request/execute slashing with an external veto window.
    pub const VETO: u64 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_address() {
        let mut addr: Address = [0u8; 20];
        addr[0] = 0xAB;
        addr[19] = 0x01;
        let rendered = fmt_address(&addr);
        assert!(rendered.starts_with("0xab"));
        assert!(rendered.ends_with("01"));
        assert_eq!(rendered.len(), 2 + 40);
    }

    #[test]
    fn test_subnetwork_identity() {
        let network: Address = [0x11; 20];
        let a = Subnetwork::new(network, 0);
        let b = Subnetwork::new(network, 1);
        assert_ne!(a, b);
        assert_eq!(a, Subnetwork::new(network, 0));
    }
}
