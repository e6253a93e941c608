//! # rsm-registry
//!
//! Epoch clock and epoch-gated membership registry.
//!
//! ## Overview
//!
//! This crate provides the two time-related building blocks of the
//! middleware:
//!
//! - **`EpochClock`**: converts wall-clock timestamps into a monotonic epoch
//!   counter of fixed duration.
//! - **`EpochGatedRegistry`**: an insertion-ordered set of addresses where
//!   insertion and removal take effect only from a future epoch onward,
//!   with point-in-time "was this member active at epoch E" queries and a
//!   mandatory grace period before removal or reactivation.
//!
//! Membership changes are always scheduled one epoch in the future, never
//! immediately. Any computation referencing the current epoch therefore sees
//! a closed snapshot: no member can be added or removed mid-epoch, which
//! keeps stake and slash evaluations reproducible from historical data.
//!
//! The registry is a pure state machine: it never reads a clock. Callers
//! supply the current epoch (from an [`EpochClock`]) with each mutation,
//! which keeps the state machine deterministic and directly testable.

pub mod epoch;
pub mod error;
pub mod registry;
pub mod time;

pub use epoch::EpochClock;
pub use error::{RegistryError, RegistryResult};
pub use registry::{EpochGatedRegistry, RegistryEntry};
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource};
