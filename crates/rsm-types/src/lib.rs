//! # Shared Types Crate
//!
//! Domain primitives shared across the restaking middleware crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-crate types are defined here.
//! - **Ledger-native widths**: addresses are 20 bytes, amounts are `u128`,
//!   epochs and timestamps are `u64` unix-second quantities.

pub mod entities;

pub use entities::*;
