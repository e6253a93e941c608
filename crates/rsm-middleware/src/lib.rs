//! # rsm-middleware
//!
//! Membership and exposure-accounting core of a restaking middleware.
//!
//! ## Overview
//!
//! This crate tracks which collateral vaults and which operators are
//! currently allowed to participate in a network, computes each operator's
//! economic stake and derived power at a point in time, and routes slash
//! requests to the correct enforcement mechanism:
//!
//! - **Membership orchestration**: validates candidates against external
//!   registries, then delegates to epoch-gated registries (one global
//!   operator set, one shared-vault set, one vault set per operator).
//! - **Exposure aggregation**: folds delegated stake into power across the
//!   cross product of active vaults and active subnetworks, always as of an
//!   epoch's start timestamp.
//! - **Slash routing**: dispatches to instant or vetoable slashers, with a
//!   second-phase execute for the vetoable protocol.
//!
//! ## Architecture
//!
//! ```text
//! MiddlewareService ──owns──→ EpochGatedRegistry (operators)
//!        │                    EpochGatedRegistry (shared vaults)
//!        │                    EpochGatedRegistry (per-operator vaults)
//!        │
//!        ├──reads──→ EntityRegistry / OptInService   (admission)
//!        ├──reads──→ VaultGateway / DelegationGateway (exposure)
//!        └──calls──→ SlasherGateway                   (penalties)
//! ```
//!
//! Membership changes take effect only at epoch boundaries, so any
//! computation referencing the current epoch sees a closed snapshot, and a
//! disabled member stays provable via `is_*_active_at` for a full slashing
//! window before it can be removed.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rsm_middleware::{MiddlewareConfig, MiddlewareService};
//!
//! let service = MiddlewareService::new(
//!     config,
//!     operator_registry,
//!     vault_registry,
//!     opt_in,
//!     vaults,
//!     delegation,
//!     slashers,
//! )?;
//!
//! service.register_operator(authority, operator).await?;
//! let power = service.operator_power(epoch, operator).await?;
//! ```

pub mod config;
pub mod error;
pub mod ports;
pub mod service;

pub use config::MiddlewareConfig;
pub use error::{MiddlewareError, MiddlewareResult};
pub use ports::inbound::{MiddlewareApi, SlashResponse};
pub use ports::outbound::{
    DelegationGateway, EntityRegistry, IdentityPower, OptInService, SlasherGateway, StakeToPower,
    VaultGateway,
};
pub use service::MiddlewareService;
