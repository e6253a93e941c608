//! Middleware configuration
//!
//! One immutable struct passed to the service at construction. Never
//! ambient global state.

use rsm_types::{Address, DurationSecs, Subnetwork, Timestamp};
use serde::{Deserialize, Serialize};

/// Process-wide middleware configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Administrative authority; the only caller allowed to mutate
    /// membership or dispatch slashes.
    pub authority: Address,
    /// Network identity this middleware serves.
    pub network: Address,
    /// Active subnetwork identifiers within the network.
    pub subnetworks: Vec<u64>,
    /// Timestamp of epoch 0.
    pub epoch_origin: Timestamp,
    /// Epoch duration in seconds. Must be > 0.
    pub epoch_duration: DurationSecs,
    /// Slashing window in seconds. Doubles as the membership grace period:
    /// a disabled entry stays provable for at least this long.
    pub slashing_window: DurationSecs,
}

impl MiddlewareConfig {
    /// Active subnetwork set, qualified with the network identity.
    pub fn subnetwork_set(&self) -> Vec<Subnetwork> {
        self.subnetworks
            .iter()
            .map(|&identifier| Subnetwork::new(self.network, identifier))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subnetwork_set_is_network_qualified() {
        let config = MiddlewareConfig {
            authority: [0xAA; 20],
            network: [0x01; 20],
            subnetworks: vec![0, 1],
            epoch_origin: 0,
            epoch_duration: 100,
            slashing_window: 250,
        };

        let set = config.subnetwork_set();
        assert_eq!(set.len(), 2);
        assert_eq!(set[0], Subnetwork::new([0x01; 20], 0));
        assert_eq!(set[1], Subnetwork::new([0x01; 20], 1));
    }
}
